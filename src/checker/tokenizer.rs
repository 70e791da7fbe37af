use crate::Span;
use unicode_segmentation::UnicodeSegmentation;

/// A maximal run of alphabetic characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub span: Span,
}

/// Split text into alphabetic runs. Digits, punctuation and whitespace end a
/// run and are never part of a token.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    // (byte offset, char offset) where the current run began
    let mut run_start: Option<(usize, usize)> = None;
    let mut char_pos = 0;

    for (byte_idx, grapheme) in text.grapheme_indices(true) {
        let is_alpha = grapheme
            .chars()
            .next()
            .map(char::is_alphabetic)
            .unwrap_or(false);

        match (is_alpha, run_start) {
            (true, None) => run_start = Some((byte_idx, char_pos)),
            (false, Some((start_byte, start_char))) => {
                tokens.push(Token {
                    text: &text[start_byte..byte_idx],
                    span: Span::new(start_char, char_pos),
                });
                run_start = None;
            }
            _ => {}
        }

        char_pos += grapheme.chars().count();
    }

    if let Some((start_byte, start_char)) = run_start {
        tokens.push(Token {
            text: &text[start_byte..],
            span: Span::new(start_char, char_pos),
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabetic_runs() {
        let tokens = tokenize("fix(api): handle 404s, again!");
        let words: Vec<_> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(words, vec!["fix", "api", "handle", "s", "again"]);
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[2].span, Span::new(10, 16));
    }

    #[test]
    fn test_empty_and_symbols_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("123 -- !!").is_empty());
    }

    #[test]
    fn test_spans_are_char_offsets() {
        let tokens = tokenize("naïve café");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].span, Span::new(0, 5));
        assert_eq!(tokens[1].span, Span::new(6, 10));
        assert_eq!(tokens[1].text, "café");
    }

    #[test]
    fn test_contraction_splits() {
        let words: Vec<_> = tokenize("don't").iter().map(|t| t.text).collect();
        assert_eq!(words, vec!["don", "t"]);
    }
}
