pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod prompt;
pub mod render;

pub use checker::{Checker, SpellChecker};
pub use config::Config;
pub use prompt::{PromptError, SpellInput};

use serde::Serialize;

/// Half-open range of char offsets into a checked string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A single detected misspelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpellFinding {
    /// Exact substring at `span`, original casing preserved.
    pub word: String,
    pub span: Span,
    /// Best-first, at most three entries.
    pub suggestions: Vec<String>,
    pub is_misspelled: bool,
}

/// Convert a char offset into a byte offset, clamping to the end of `text`.
pub fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
