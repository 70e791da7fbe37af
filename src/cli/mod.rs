pub mod commit;
pub mod output;
