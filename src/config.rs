use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Effective settings after every layer has been applied.
#[derive(Debug, Clone)]
pub struct Config {
    pub language: String,
    pub personal_dictionary: Option<PathBuf>,

    /// Explicit FST dictionary file, overriding the installed one.
    pub dictionary_path: Option<PathBuf>,
    pub use_dictionary: bool,
    pub ignore_patterns: Vec<String>,

    /// Live checking inside the input prompt.
    pub spell_check: bool,
    pub debounce_ms: u64,
    pub highlight: String,

    /// Apply the best suggestion to free-text answers on submit.
    pub auto_correct: bool,
    pub technical_words: Vec<String>,
    pub typo_rules: HashMap<String, String>,
    pub max_header_length: usize,
}

fn default_language() -> String {
    "en_US".to_string()
}

fn default_debounce_ms() -> u64 {
    150
}

fn default_highlight() -> String {
    "underline".to_string()
}

fn default_max_header_length() -> usize {
    72
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            personal_dictionary: None,
            dictionary_path: None,
            use_dictionary: true,
            ignore_patterns: vec![
                r"\b[A-Z0-9_]{2,}\b".to_string(),    // ALL_CAPS
                r"https?://\S+".to_string(),         // URLs
                r"\b[a-fA-F0-9]*[0-9][a-fA-F0-9]*\b".to_string(), // Hashes, at least one digit
                r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}".to_string(), // Emails
                r"`[^`]*`".to_string(),              // Inline code
            ],
            spell_check: true,
            debounce_ms: default_debounce_ms(),
            highlight: default_highlight(),
            auto_correct: false,
            technical_words: Vec::new(),
            typo_rules: HashMap::new(),
            max_header_length: default_max_header_length(),
        }
    }
}

/// One config file as written. Keys left out are `None` and leave the
/// lower layer untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub language: Option<String>,
    pub personal_dictionary: Option<PathBuf>,
    pub dictionary_path: Option<PathBuf>,
    pub use_dictionary: Option<bool>,
    pub ignore_patterns: Option<Vec<String>>,
    pub spell_check: Option<bool>,
    pub debounce_ms: Option<u64>,
    pub highlight: Option<String>,
    pub auto_correct: Option<bool>,
    #[serde(default)]
    pub technical_words: Vec<String>,
    #[serde(default)]
    pub typo_rules: HashMap<String, String>,
    pub max_header_length: Option<usize>,
}

/// Values given on the command line; `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub language: Option<String>,
    pub personal_dictionary: Option<PathBuf>,
    pub dictionary_path: Option<PathBuf>,
    pub no_dictionary: bool,
    pub no_spell_check: bool,
    pub auto_correct: bool,
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(overrides: Overrides) -> Result<Self> {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        // Load local config (overrides global)
        let local_path = PathBuf::from(".spellcommit.toml");
        if local_path.exists() {
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        config.apply(overrides);

        // Set default personal dictionary if not specified
        if config.personal_dictionary.is_none() {
            config.personal_dictionary = Self::default_personal_dict_path();
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<ConfigFile> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Layer `file` on top of `self`. Lists of jargon and typo rules add up
    /// across layers; every other key replaces the lower value when set.
    fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(language) = file.language {
            self.language = language;
        }
        if let Some(dict) = file.personal_dictionary {
            self.personal_dictionary = Some(dict);
        }
        if let Some(path) = file.dictionary_path {
            self.dictionary_path = Some(path);
        }
        if let Some(use_dictionary) = file.use_dictionary {
            self.use_dictionary = use_dictionary;
        }
        if let Some(patterns) = file.ignore_patterns {
            self.ignore_patterns = patterns;
        }
        if let Some(spell_check) = file.spell_check {
            self.spell_check = spell_check;
        }
        if let Some(debounce_ms) = file.debounce_ms {
            self.debounce_ms = debounce_ms;
        }
        if let Some(highlight) = file.highlight {
            self.highlight = highlight;
        }
        if let Some(auto_correct) = file.auto_correct {
            self.auto_correct = auto_correct;
        }
        if let Some(max) = file.max_header_length {
            self.max_header_length = max;
        }
        self.technical_words.extend(file.technical_words);
        self.typo_rules.extend(file.typo_rules);
        self
    }

    fn apply(&mut self, overrides: Overrides) {
        if let Some(language) = overrides.language {
            self.language = language;
        }
        if let Some(dict) = overrides.personal_dictionary {
            self.personal_dictionary = Some(dict);
        }
        if let Some(path) = overrides.dictionary_path {
            self.dictionary_path = Some(path);
        }
        if overrides.no_dictionary {
            self.use_dictionary = false;
        }
        if overrides.no_spell_check {
            self.spell_check = false;
        }
        if overrides.auto_correct {
            self.auto_correct = true;
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellcommit").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_personal_dict_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellcommit").map(|dirs| dirs.config_dir().join("personal.txt"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellcommit").map(|dirs| dirs.data_dir().to_path_buf())
    }
}
