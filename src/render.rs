//! Stateless helpers that turn text, findings and terminal geometry into
//! strings ready to be written to the terminal.

use crate::{byte_offset, SpellFinding, Span};
use console::Style;

/// Width assumed when the terminal cannot report one.
pub const DEFAULT_WIDTH: usize = 80;

/// Emphasis applied to misspelled words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightStyle {
    #[default]
    Underline,
    Reverse,
    Red,
    Yellow,
    Bold,
    /// No emphasis at all.
    Plain,
}

const STYLE_NAMES: &[(&str, HighlightStyle)] = &[
    ("underline", HighlightStyle::Underline),
    ("reverse", HighlightStyle::Reverse),
    ("red", HighlightStyle::Red),
    ("yellow", HighlightStyle::Yellow),
    ("bold", HighlightStyle::Bold),
    ("plain", HighlightStyle::Plain),
    ("none", HighlightStyle::Plain),
];

impl HighlightStyle {
    /// Resolve a configured style name, falling back to the default style.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        STYLE_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, style)| *style)
            .unwrap_or_else(|| {
                log::warn!("Unknown highlight style '{}', using default", name);
                HighlightStyle::default()
            })
    }

    fn style(self) -> Option<Style> {
        let style = match self {
            HighlightStyle::Underline => Style::new().underlined(),
            HighlightStyle::Reverse => Style::new().reverse(),
            HighlightStyle::Red => Style::new().red().underlined(),
            HighlightStyle::Yellow => Style::new().yellow().underlined(),
            HighlightStyle::Bold => Style::new().bold(),
            HighlightStyle::Plain => return None,
        };
        Some(style.force_styling(true))
    }

    pub fn paint(self, text: &str) -> String {
        match self.style() {
            Some(style) => style.apply_to(text).to_string(),
            None => text.to_string(),
        }
    }
}

/// Emphasise every finding's span in `text`.
///
/// Spans are applied from the highest start down so inserted escape codes
/// never shift spans still to be processed. Out-of-bounds or overlapping
/// spans are clipped.
pub fn highlight(text: &str, findings: &[SpellFinding], style: HighlightStyle) -> String {
    let mut spans: Vec<Span> = findings.iter().map(|f| f.span).collect();
    spans.sort_by(|a, b| b.start.cmp(&a.start));

    let mut out = text.to_string();
    // Everything at or after `floor` has already been styled
    let mut floor = text.chars().count();

    for span in spans {
        let end = span.end.min(floor);
        let start = span.start.min(end);
        if start != span.start || end != span.end {
            log::warn!(
                "Clipped highlight span {}..{} to {}..{}",
                span.start,
                span.end,
                start,
                end
            );
        }
        if start == end {
            continue;
        }

        let (start_byte, end_byte) = (byte_offset(text, start), byte_offset(text, end));
        out.replace_range(
            start_byte..end_byte,
            &style.paint(&text[start_byte..end_byte]),
        );
        floor = start;
    }

    out
}

/// Where things land once `prefix_len + text_len` columns are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Terminal rows the prompt occupies.
    pub rows: usize,
    pub end_row: usize,
    pub end_col: usize,
    pub cursor_row: usize,
    pub cursor_col: usize,
}

impl Layout {
    pub fn compute(prefix_len: usize, text_len: usize, cursor: usize, width: usize) -> Self {
        let width = effective_width(width);
        let end = prefix_len + text_len;
        let cursor = prefix_len + cursor.min(text_len);

        Self {
            rows: rows_for(end, width),
            end_row: end / width,
            end_col: end % width,
            cursor_row: cursor / width,
            cursor_col: cursor % width,
        }
    }

    /// True when the text ends exactly on a row boundary, where terminals
    /// hold the cursor on the previous row until the next character.
    pub fn ends_on_boundary(&self) -> bool {
        self.end_row > 0 && self.end_col == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    None,
    Left,
    Right,
}

/// Movement from the end of the rendered text back to the logical cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMove {
    pub rows_up: usize,
    pub columns: usize,
    pub direction: Direction,
}

impl CursorMove {
    pub const NONE: CursorMove = CursorMove {
        rows_up: 0,
        columns: 0,
        direction: Direction::None,
    };

    /// ANSI sequence performing this move.
    pub fn to_ansi(&self) -> String {
        let mut seq = String::new();
        if self.rows_up > 0 {
            seq.push_str(&format!("\x1b[{}A\r", self.rows_up));
        }
        if self.columns > 0 {
            match self.direction {
                Direction::Left => seq.push_str(&format!("\x1b[{}D", self.columns)),
                Direction::Right => seq.push_str(&format!("\x1b[{}C", self.columns)),
                Direction::None => {}
            }
        }
        seq
    }
}

/// Compute how to get from the end of the text to the cursor.
///
/// A cursor on an earlier row means "up N rows, then right to its column";
/// on the same row it means "left by the column difference".
pub fn compute_cursor_move(
    prefix_len: usize,
    text_len: usize,
    cursor: usize,
    width: usize,
) -> CursorMove {
    let layout = Layout::compute(prefix_len, text_len, cursor, width);

    if layout.cursor_row < layout.end_row {
        CursorMove {
            rows_up: layout.end_row - layout.cursor_row,
            columns: layout.cursor_col,
            direction: Direction::Right,
        }
    } else if layout.cursor_col < layout.end_col {
        CursorMove {
            rows_up: 0,
            columns: layout.end_col - layout.cursor_col,
            direction: Direction::Left,
        }
    } else {
        CursorMove::NONE
    }
}

/// Clear `line_count` rows of a previous render, given the row the cursor
/// was left on, and park the cursor at the start of the first one.
pub fn erase_rows(line_count: usize, cursor_row: usize) -> String {
    let mut seq = String::new();
    if cursor_row > 0 {
        seq.push_str(&format!("\x1b[{}A", cursor_row));
    }
    seq.push('\r');
    for row in 0..line_count.max(1) {
        if row > 0 {
            seq.push_str("\x1b[1B");
        }
        seq.push_str("\x1b[2K");
    }
    if line_count > 1 {
        seq.push_str(&format!("\x1b[{}A", line_count - 1));
    }
    seq
}

pub fn effective_width(width: usize) -> usize {
    if width == 0 {
        DEFAULT_WIDTH
    } else {
        width
    }
}

/// Rows needed to show `len` columns of output.
pub fn rows_for(len: usize, width: usize) -> usize {
    len / effective_width(width) + 1
}
