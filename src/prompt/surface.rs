use console::Term;
use std::io::Write;

/// Where the prompt draws itself.
pub trait Surface: Write + Send {
    /// Column count, if the terminal can report one.
    fn columns(&self) -> Option<usize>;
}

impl Surface for Term {
    fn columns(&self) -> Option<usize> {
        self.size_checked().map(|(_rows, cols)| cols as usize)
    }
}

#[cfg(test)]
pub(crate) use capture::Capture;
