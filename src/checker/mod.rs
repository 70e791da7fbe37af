pub mod dictionary;
pub mod rules;
pub mod suggestions;
pub mod tokenizer;

use crate::{byte_offset, Config, Span, SpellFinding};
use anyhow::{Context, Result};
use dictionary::{Dictionary, Lexicon};
use regex::Regex;
use rules::SpellTables;
use serde::Serialize;
use std::fs;
use std::sync::Arc;

/// Upper bound on suggestions attached to a finding.
pub const MAX_SUGGESTIONS: usize = 3;

/// The slice of the engine the input widget depends on.
pub trait Checker: Send + Sync {
    fn check(&self, text: &str) -> Vec<SpellFinding>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub has_dictionary: bool,
    pub technical_word_count: usize,
    pub typo_rule_count: usize,
}

pub struct SpellChecker {
    tables: Arc<SpellTables>,
    dictionary: Option<Box<dyn Lexicon>>,
    ignore_patterns: Vec<Regex>,
}

impl SpellChecker {
    pub fn new(config: &Config) -> Result<Self> {
        // Personal dictionary and configured jargon extend the allowlist
        let mut extra_words: Vec<String> = config.technical_words.clone();
        if let Some(personal_dict_path) = &config.personal_dictionary {
            if personal_dict_path.exists() {
                let content = fs::read_to_string(personal_dict_path)
                    .context("Failed to read personal dictionary")?;
                extra_words.extend(
                    content
                        .lines()
                        .map(str::trim)
                        .filter(|word| !word.is_empty() && !word.starts_with('#'))
                        .map(str::to_string),
                );
            }
        }

        let tables = SpellTables::builtin().extended(
            config
                .typo_rules
                .iter()
                .map(|(typo, fix)| (typo.clone(), fix.clone())),
            extra_words,
        );

        let checker = Self::from_parts(Arc::new(tables), load_dictionary(config))
            .with_ignore_patterns(&config.ignore_patterns);

        Ok(checker)
    }

    /// Assemble an engine from explicit tables and an optional dictionary.
    pub fn from_parts(tables: Arc<SpellTables>, dictionary: Option<Box<dyn Lexicon>>) -> Self {
        Self {
            tables,
            dictionary,
            ignore_patterns: Vec::new(),
        }
    }

    /// Tokens lying entirely inside a match of any pattern are never checked.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        for pattern in patterns {
            match Regex::new(pattern) {
                Ok(re) => self.ignore_patterns.push(re),
                Err(e) => log::warn!("Invalid ignore pattern '{}': {}", pattern, e),
            }
        }
        self
    }

    /// Findings in ascending text order. Never fails; without a dictionary
    /// only typo rules can produce findings.
    pub fn check(&self, text: &str) -> Vec<SpellFinding> {
        let ignored = self.ignored_regions(text);
        let mut findings = Vec::new();

        for token in tokenizer::tokenize(text) {
            let word_lower = token.text.to_lowercase();

            if self.should_ignore(&word_lower) {
                continue;
            }

            // A match that is exactly the token only describes its shape
            // (ALL_CAPS, hex) and does not hide a known typo
            let correction = self.tables.correction(&word_lower);
            if ignored.iter().any(|region| {
                region.start <= token.span.start
                    && token.span.end <= region.end
                    && (correction.is_none() || *region != token.span)
            }) {
                continue;
            }

            let suggestions = if let Some(fix) = correction {
                vec![fix.to_string()]
            } else if let Some(dictionary) = &self.dictionary {
                if dictionary.is_known(&word_lower) {
                    continue;
                }
                let mut suggestions = dictionary.suggest(&word_lower, MAX_SUGGESTIONS);
                suggestions.truncate(MAX_SUGGESTIONS);
                suggestions
            } else {
                continue;
            };

            findings.push(SpellFinding {
                word: token.text.to_string(),
                span: token.span,
                suggestions,
                is_misspelled: true,
            });
        }

        findings
    }

    /// Single best correction for a word, if it needs one.
    pub fn suggest_first(&self, word: &str) -> Option<String> {
        let word_lower = word.to_lowercase();

        if let Some(fix) = self.tables.correction(&word_lower) {
            return Some(fix.to_string());
        }

        if self.should_ignore(&word_lower) {
            return None;
        }

        let dictionary = self.dictionary.as_ref()?;
        if dictionary.is_known(&word_lower) {
            return None;
        }
        dictionary.suggest(&word_lower, 1).into_iter().next()
    }

    /// Replace every finding that has a suggestion with its best one.
    pub fn auto_correct(&self, text: &str) -> String {
        let mut findings = self.check(text);
        // Highest offset first so earlier offsets stay valid
        findings.sort_by(|a, b| b.span.start.cmp(&a.span.start));

        let mut corrected = text.to_string();
        for finding in findings {
            let Some(best) = finding.suggestions.first() else {
                continue;
            };
            let start = byte_offset(text, finding.span.start);
            let end = byte_offset(text, finding.span.end);
            corrected.replace_range(start..end, &match_case(&finding.word, best));
        }

        corrected
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            has_dictionary: self.dictionary.is_some(),
            technical_word_count: self.tables.technical_word_count(),
            typo_rule_count: self.tables.typo_rule_count(),
        }
    }

    fn should_ignore(&self, word_lower: &str) -> bool {
        let len = word_lower.chars().count();

        // Too short to judge (also covers single letters)
        if len <= 2 {
            return true;
        }

        // Skip all numbers
        if word_lower.chars().all(|c| c.is_numeric()) {
            return true;
        }

        self.tables.is_technical(word_lower)
    }

    fn ignored_regions(&self, text: &str) -> Vec<Span> {
        let mut regions = Vec::new();
        for pattern in &self.ignore_patterns {
            for m in pattern.find_iter(text) {
                let start = text[..m.start()].chars().count();
                let end = start + m.as_str().chars().count();
                regions.push(Span::new(start, end));
            }
        }
        regions
    }
}

impl Checker for SpellChecker {
    fn check(&self, text: &str) -> Vec<SpellFinding> {
        SpellChecker::check(self, text)
    }
}

fn load_dictionary(config: &Config) -> Option<Box<dyn Lexicon>> {
    if !config.use_dictionary {
        return None;
    }

    let loaded = match &config.dictionary_path {
        Some(path) => Dictionary::load_from_path(path),
        None => Dictionary::load(&config.language),
    };

    match loaded {
        Ok(dictionary) => {
            log::debug!("Loaded dictionary with {} words", dictionary.len());
            Some(Box::new(dictionary))
        }
        Err(e) => {
            log::warn!("Dictionary unavailable, checking typo rules only: {:#}", e);
            None
        }
    }
}

/// Carry the casing shape of `original` over to `replacement`.
fn match_case(original: &str, replacement: &str) -> String {
    let mut letters = original.chars().filter(|c| c.is_alphabetic());
    let all_upper = original.chars().count() > 1
        && original
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase);

    if all_upper {
        return replacement.to_uppercase();
    }

    match letters.next() {
        Some(first) if first.is_uppercase() => {
            let mut chars = replacement.chars();
            match chars.next() {
                Some(head) => head.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        _ => replacement.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn typo_only() -> SpellChecker {
        SpellChecker::from_parts(SpellTables::builtin(), None)
    }

    fn with_dictionary(words: &[&str]) -> SpellChecker {
        let dictionary = Dictionary::from_words(words).unwrap();
        SpellChecker::from_parts(SpellTables::builtin(), Some(Box::new(dictionary)))
    }

    fn english() -> SpellChecker {
        with_dictionary(&[
            "fix", "function", "that", "handles", "handle", "user", "authentication", "the",
            "add", "support", "for", "login", "page", "this", "update", "lot",
        ])
    }

    #[test]
    fn test_commit_subject_scenario() {
        let checker = typo_only();
        let text = "Fix fucntion that handls user authetication";
        let findings = checker.check(text);

        let pairs: Vec<_> = findings
            .iter()
            .map(|f| (f.word.as_str(), f.suggestions[0].as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("fucntion", "function"),
                ("handls", "handles"),
                ("authetication", "authentication"),
            ]
        );
        assert_eq!(
            checker.auto_correct(text),
            "Fix function that handles user authentication"
        );
    }

    #[test]
    fn test_allowlisted_tokens_never_flagged() {
        // Dictionary knows none of these words
        let checker = with_dictionary(&["unrelated"]);
        assert!(checker.check("react jwt cors api").is_empty());
        assert!(checker.check("Deploy to Kubernetes").iter().all(|f| f.word != "Kubernetes"));
    }

    #[test]
    fn test_typo_rule_beats_dictionary() {
        // The dictionary even claims "teh" is a word
        let checker = with_dictionary(&["teh", "tea", "ten", "the"]);
        let findings = checker.check("teh");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].suggestions, vec!["the"]);
        assert!(findings[0].is_misspelled);
    }

    #[test]
    fn test_dictionary_suggestions_limited_to_three() {
        let checker = with_dictionary(&["cat", "cot", "cut", "cap", "car", "can"]);
        let findings = checker.check("cxt");
        assert_eq!(findings.len(), 1);
        assert!(findings[0].suggestions.len() <= MAX_SUGGESTIONS);
        assert!(!findings[0].suggestions.is_empty());
    }

    #[test]
    fn test_unknown_word_without_suggestions() {
        let checker = english();
        let findings = checker.check("add qwzxv support");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].word, "qwzxv");
        assert!(findings[0].suggestions.is_empty());
        // Nothing to apply, text comes back unchanged
        assert_eq!(checker.auto_correct("add qwzxv support"), "add qwzxv support");
    }

    #[test]
    fn test_short_and_numeric_tokens_skipped() {
        let checker = english();
        assert!(checker.check("a xy 42 7z").is_empty());
    }

    #[test]
    fn test_spans_and_original_casing() {
        let checker = typo_only();
        let findings = checker.check("Update: Teh parser");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].word, "Teh");
        assert_eq!(findings[0].span, Span::new(8, 11));
    }

    #[test]
    fn test_degraded_mode_reports_no_dictionary() {
        let stats = typo_only().stats();
        assert!(!stats.has_dictionary);
        assert!(stats.typo_rule_count > 100);
        assert!(stats.technical_word_count > 100);
        assert!(english().stats().has_dictionary);
    }

    #[test]
    fn test_degraded_mode_only_flags_typo_rules() {
        let checker = typo_only();
        assert!(checker.check("completely qwzxv gibberish").is_empty());
    }

    #[test]
    fn test_suggest_first() {
        let checker = english();
        assert_eq!(checker.suggest_first("teh"), Some("the".to_string()));
        assert_eq!(checker.suggest_first("functino"), Some("function".to_string()));
        assert_eq!(checker.suggest_first("function"), None);
        assert_eq!(checker.suggest_first("qwzxv"), None);
        assert_eq!(checker.suggest_first("api"), None);
        assert_eq!(typo_only().suggest_first("functino"), None);
    }

    #[test]
    fn test_auto_correct_preserves_case_shape() {
        let checker = typo_only();
        assert_eq!(checker.auto_correct("Teh fix"), "The fix");
        assert_eq!(checker.auto_correct("TEH fix"), "THE fix");
        assert_eq!(checker.auto_correct("alot of fixes"), "a lot of fixes");
    }

    #[test]
    fn test_ignore_patterns_skip_regions() {
        let checker = typo_only().with_ignore_patterns(&[
            r"`[^`]*`".to_string(),
            r"https?://\S+".to_string(),
            "(".to_string(), // invalid, skipped with a warning
        ]);
        assert!(checker.check("rename `teh` helper").is_empty());
        assert!(checker.check("see https://example.com/teh").is_empty());
        assert_eq!(checker.check("teh `teh`").len(), 1);
    }

    #[test]
    fn test_default_config_still_flags_capitalised_typos() {
        let config = Config {
            use_dictionary: false,
            ..Config::default()
        };
        let checker = SpellChecker::new(&config).unwrap();

        let findings = checker.check("TEH parser");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].word, "TEH");
        assert_eq!(findings[0].suggestions, vec!["the"]);
        assert_eq!(checker.auto_correct("FIX TEH BUG"), "FIX THE BUG");

        // Acronyms and code spans are still skipped
        assert!(checker.check("bump HTTP client in `teh_helper`").is_empty());
    }

    #[test]
    fn test_default_hash_pattern_needs_a_digit() {
        let checker = with_dictionary(&["the", "cow"])
            .with_ignore_patterns(&Config::default().ignore_patterns);

        let words: Vec<_> = checker
            .check("the cow acceded defaced")
            .into_iter()
            .map(|f| f.word)
            .collect();
        assert_eq!(words, vec!["acceded", "defaced"]);

        assert!(checker.check("the deadbeef1 cow 3fa9c0de").is_empty());
    }

    #[test]
    fn test_match_case() {
        assert_eq!(match_case("teh", "the"), "the");
        assert_eq!(match_case("Teh", "the"), "The");
        assert_eq!(match_case("TEH", "the"), "THE");
        assert_eq!(match_case("T", "the"), "The");
    }

    fn word_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("teh".to_string()),
            Just("Fucntion".to_string()),
            Just("handls".to_string()),
            Just("kubernetes".to_string()),
            Just("api".to_string()),
            Just("the".to_string()),
            // no typo rule starts with x or z
            "[xz][a-z]{0,7}",
            "[0-9]{1,3}",
        ]
    }

    fn text_strategy() -> impl Strategy<Value = String> {
        (
            prop::collection::vec(word_strategy(), 0..12),
            prop::collection::vec(prop_oneof![Just(" "), Just(", "), Just("-"), Just(": ")], 12),
        )
            .prop_map(|(words, seps)| {
                let mut text = String::new();
                for (word, sep) in words.iter().zip(seps.iter()) {
                    text.push_str(word);
                    text.push_str(sep);
                }
                text
            })
    }

    proptest! {
        #[test]
        fn prop_findings_sorted_and_disjoint(text in text_strategy()) {
            let findings = english().check(&text);
            for pair in findings.windows(2) {
                prop_assert!(pair[0].span.start < pair[1].span.start);
                prop_assert!(!pair[0].span.overlaps(&pair[1].span));
            }
            for finding in &findings {
                let word: String = text
                    .chars()
                    .skip(finding.span.start)
                    .take(finding.span.len())
                    .collect();
                prop_assert_eq!(&word, &finding.word);
            }
        }

        #[test]
        fn prop_auto_correct_idempotent(text in text_strategy()) {
            for checker in [typo_only(), english()] {
                let once = checker.auto_correct(&text);
                prop_assert_eq!(checker.auto_correct(&once), once.clone());
            }
        }
    }
}
