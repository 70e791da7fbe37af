use crate::checker::dictionary::Dictionary;
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Pinned to a commit so a download always yields the same word list
const WORDLIST_BASE_URL: &str =
    "https://raw.githubusercontent.com/dwyl/english-words/6e4bc58ad764c3e6df8b5be4048671962c9d6a23";
const WORDLIST_VERSION: &str = "2023.12";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledDictionary {
    pub language: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Every `<language>.dict` file in `data_dir`, sorted by language.
pub fn installed_dictionaries(data_dir: &Path) -> Result<Vec<InstalledDictionary>> {
    if !data_dir.exists() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in fs::read_dir(data_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) != Some("dict") {
            continue;
        }
        let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        found.push(InstalledDictionary {
            language: language.to_string(),
            size_bytes: fs::metadata(&path)?.len(),
            path,
        });
    }

    found.sort_by(|a, b| a.language.cmp(&b.language));
    Ok(found)
}

pub fn list_dictionaries() -> Result<()> {
    let data_dir = crate::config::Config::data_dir().context("Failed to get data directory")?;
    let installed = installed_dictionaries(&data_dir)?;

    if installed.is_empty() {
        println!("{}", "No dictionaries installed.".yellow());
        println!(
            "Run {} to download a dictionary.",
            "spellcommit dict download en_US".cyan()
        );
        println!("Until then only built-in typo rules are checked.");
        return Ok(());
    }

    println!("{}", "Installed dictionaries:".bold());
    println!();

    for dict in &installed {
        println!(
            "  {} {} ({})",
            "✓".green(),
            dict.language.cyan().bold(),
            format!("{}KB", dict.size_bytes / 1024).dimmed()
        );
    }

    println!();
    println!(
        "Data directory: {}",
        data_dir.display().to_string().dimmed()
    );

    Ok(())
}

/// Lowercase, alphabetic-only words of two or more letters.
pub fn normalise_words(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| word.chars().count() > 1 && word.chars().all(char::is_alphabetic))
        .collect()
}

fn wordlist_url(language: &str) -> Result<String> {
    match language {
        "en_US" | "en_GB" => Ok(format!("{}/words_alpha.txt", WORDLIST_BASE_URL)),
        other => anyhow::bail!(
            "Language '{}' is not supported. Only 'en_US' and 'en_GB' are currently available.",
            other
        ),
    }
}

pub fn download_dictionary(language: &str) -> Result<()> {
    let wordlist_url = wordlist_url(language)?;

    println!(
        "{} dictionary for {} (version: {})...",
        "Downloading".cyan().bold(),
        language.yellow(),
        WORDLIST_VERSION.dimmed()
    );
    println!("Source: {}", wordlist_url.dimmed());

    let data_dir = crate::config::Config::data_dir().context("Failed to get data directory")?;
    fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid progress template")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Downloading...");

    let response =
        reqwest::blocking::get(&wordlist_url).context("Failed to download dictionary")?;

    if !response.status().is_success() {
        pb.abandon_with_message("Download failed");
        anyhow::bail!("Failed to download dictionary: HTTP {}", response.status());
    }

    let content = response.text()?;
    pb.finish_with_message("Download complete");

    println!("{}", "Building dictionary...".cyan());
    let words = normalise_words(&content);
    println!("Found {} words", words.len().to_string().yellow());

    let dict_path = data_dir.join(format!("{}.dict", language));
    Dictionary::build_from_words(&words, &dict_path)?;

    println!(
        "{} Dictionary installed: {}",
        "✓".green().bold(),
        dict_path.display().to_string().cyan()
    );

    Ok(())
}

pub fn show_info(language: &str) -> Result<()> {
    let dict_path = Dictionary::get_dictionary_path(language)?;

    if !dict_path.exists() {
        println!(
            "{} Dictionary for {} not found.",
            "✗".red().bold(),
            language.yellow()
        );
        println!(
            "Run {} to download it.",
            format!("spellcommit dict download {}", language).cyan()
        );
        return Ok(());
    }

    let metadata = fs::metadata(&dict_path)?;

    println!("{}", format!("Dictionary: {}", language).bold());
    println!("  Path: {}", dict_path.display());
    println!("  Size: {} KB", metadata.len() / 1024);
    println!("  Version: {}", WORDLIST_VERSION);
    println!("  Format: FST (Finite State Transducer)");

    match Dictionary::load_from_path(&dict_path) {
        Ok(dict) => println!("  Words: {}", dict.len().to_string().yellow()),
        Err(e) => println!("  {}: {:#}", "Error loading dictionary".red(), e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalise_words() {
        let words = normalise_words("Apple\n  banana \nx\nco-op\n42\n\nnaïve\n");
        assert_eq!(words, vec!["apple", "banana", "naïve"]);
    }

    #[test]
    fn test_wordlist_url() {
        assert!(wordlist_url("en_GB").unwrap().ends_with("words_alpha.txt"));
        assert!(wordlist_url("fr_FR").is_err());
    }

    #[test]
    fn test_installed_dictionaries() {
        let dir = TempDir::new().unwrap();
        let words = vec!["hello".to_string(), "world".to_string()];
        Dictionary::build_from_words(&words, &dir.path().join("en_US.dict")).unwrap();
        Dictionary::build_from_words(&words, &dir.path().join("en_GB.dict")).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a dictionary").unwrap();

        let installed = installed_dictionaries(dir.path()).unwrap();
        let languages: Vec<_> = installed.iter().map(|d| d.language.as_str()).collect();
        assert_eq!(languages, vec!["en_GB", "en_US"]);
        assert!(installed.iter().all(|d| d.size_bytes > 0));
    }

    #[test]
    fn test_missing_data_dir_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let installed = installed_dictionaries(&dir.path().join("absent")).unwrap();
        assert!(installed.is_empty());
    }
}
