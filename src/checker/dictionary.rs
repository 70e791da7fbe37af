use anyhow::{Context, Result};
use fst::{Automaton, IntoStreamer, Set, SetBuilder, Streamer};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

/// General-purpose word lookup backing the engine's last decision step.
pub trait Lexicon: Send + Sync {
    /// `word` is expected in lowercase.
    fn is_known(&self, word: &str) -> bool;

    /// Up to `limit` corrections, best first.
    fn suggest(&self, word: &str, limit: usize) -> Vec<String>;
}

pub struct Dictionary {
    set: Set<Vec<u8>>,
}

impl Dictionary {
    /// Load the installed dictionary for a language.
    ///
    /// Fails when nothing is installed; callers decide whether that is fatal.
    pub fn load(language: &str) -> Result<Self> {
        let dict_path = Self::get_dictionary_path(language)?;

        if !dict_path.exists() {
            anyhow::bail!(
                "No dictionary installed for '{}' (run `spellcommit dict download {}`)",
                language,
                language
            );
        }

        Self::load_from_path(&dict_path)
    }

    /// Load dictionary from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open dictionary: {}", path.display()))?;

        let reader = BufReader::new(file);
        let set = Set::new(reader.bytes().collect::<Result<Vec<_>, _>>()?)
            .context("Failed to parse dictionary")?;

        Ok(Self { set })
    }

    /// Build an in-memory dictionary from a word list.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let mut sorted: Vec<String> = words.iter().map(|w| w.as_ref().to_lowercase()).collect();
        sorted.sort();
        sorted.dedup();

        let set = Set::from_iter(sorted).context("Failed to build dictionary")?;
        Ok(Self { set })
    }

    /// Check if word exists in dictionary
    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Get all words with a given prefix
    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut results = Vec::new();
        let mut stream = self
            .set
            .search(fst::automaton::Str::new(prefix).starts_with())
            .into_stream();

        while let Some(key) = stream.next() {
            if let Ok(word) = String::from_utf8(key.to_vec()) {
                results.push(word);
            }
        }

        results
    }

    /// Words whose length is within `slack` of `len`.
    ///
    /// WARNING: walks the whole set. Only used as a last resort for very
    /// short words where prefix lookups find nothing.
    pub fn words_near_length(&self, len: usize, slack: usize) -> Vec<String> {
        let mut words = Vec::new();
        let mut stream = self.set.stream();

        while let Some(key) = stream.next() {
            if key.len().abs_diff(len) <= slack {
                if let Ok(word) = String::from_utf8(key.to_vec()) {
                    words.push(word);
                }
            }
        }

        words
    }

    /// Build dictionary file from word list
    pub fn build_from_words(words: &[String], output_path: &Path) -> Result<()> {
        let mut sorted_words = words.to_vec();
        sorted_words.sort();
        sorted_words.dedup();

        let file = File::create(output_path)
            .with_context(|| format!("Failed to create dictionary: {}", output_path.display()))?;

        let writer = BufWriter::new(file);
        let mut builder = SetBuilder::new(writer).context("Failed to create FST builder")?;

        for word in sorted_words {
            builder
                .insert(word.as_bytes())
                .context("Failed to insert word into dictionary")?;
        }

        builder.finish().context("Failed to finalize dictionary")?;

        Ok(())
    }

    pub fn get_dictionary_path(language: &str) -> Result<PathBuf> {
        let data_dir = crate::config::Config::data_dir().context("Failed to get data directory")?;

        Ok(data_dir.join(format!("{}.dict", language)))
    }
}

impl Lexicon for Dictionary {
    fn is_known(&self, word: &str) -> bool {
        self.contains(word)
    }

    fn suggest(&self, word: &str, limit: usize) -> Vec<String> {
        super::suggestions::generate(word, self, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_build_and_load_dictionary() {
        let dir = tempdir().unwrap();
        let dict_path = dir.path().join("test.dict");

        let words = vec!["hello".to_string(), "world".to_string(), "test".to_string()];

        Dictionary::build_from_words(&words, &dict_path).unwrap();

        let dict = Dictionary::load_from_path(&dict_path).unwrap();
        assert!(dict.contains("hello"));
        assert!(dict.contains("world"));
        assert!(!dict.contains("notfound"));
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn test_from_words_lowercases_and_dedups() {
        let dict = Dictionary::from_words(&["Commit", "commit", "branch"]).unwrap();
        assert_eq!(dict.len(), 2);
        assert!(dict.is_known("commit"));
        assert!(!dict.is_known("Commit"));
    }

    #[test]
    fn test_prefix_and_length_queries() {
        let dict = Dictionary::from_words(&["merge", "merged", "message", "is", "it"]).unwrap();
        assert_eq!(dict.words_with_prefix("mer"), vec!["merge", "merged"]);
        assert_eq!(dict.words_near_length(2, 0), vec!["is", "it"]);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(Dictionary::load_from_path(&dir.path().join("nope.dict")).is_err());
    }
}
