//! Guided conventional-commit authoring.

use crate::cli::output;
use crate::render::HighlightStyle;
use crate::{Config, PromptError, SpellChecker, SpellInput};
use anyhow::{Context, Result};
use console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Build,
    Ci,
    Chore,
    Revert,
}

impl CommitType {
    pub const ALL: [CommitType; 11] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Docs,
        CommitType::Style,
        CommitType::Refactor,
        CommitType::Perf,
        CommitType::Test,
        CommitType::Build,
        CommitType::Ci,
        CommitType::Chore,
        CommitType::Revert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Perf => "perf",
            CommitType::Test => "test",
            CommitType::Build => "build",
            CommitType::Ci => "ci",
            CommitType::Chore => "chore",
            CommitType::Revert => "revert",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CommitType::Feat => "A new feature",
            CommitType::Fix => "A bug fix",
            CommitType::Docs => "Documentation only changes",
            CommitType::Style => "Formatting, missing semicolons, whitespace",
            CommitType::Refactor => "A code change that neither fixes a bug nor adds a feature",
            CommitType::Perf => "A code change that improves performance",
            CommitType::Test => "Adding or correcting tests",
            CommitType::Build => "Changes to the build system or dependencies",
            CommitType::Ci => "Changes to CI configuration and scripts",
            CommitType::Chore => "Other changes that don't touch source or tests",
            CommitType::Revert => "Reverts a previous commit",
        }
    }

    fn label(self) -> String {
        format!("{:<10} {}", format!("{}:", self.as_str()), self.description())
    }
}

/// Everything the user answered, already cleaned up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAnswers {
    pub commit_type: CommitType,
    pub scope: Option<String>,
    pub subject: String,
    pub body: Option<String>,
    pub breaking: Option<String>,
    pub issues: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    pub dry_run: bool,
    /// Passed through to `git commit`.
    pub git_args: Vec<String>,
}

pub fn header(commit_type: CommitType, scope: Option<&str>, subject: &str) -> String {
    match scope {
        Some(scope) if !scope.is_empty() => {
            format!("{}({}): {}", commit_type.as_str(), scope, subject)
        }
        _ => format!("{}: {}", commit_type.as_str(), subject),
    }
}

/// Render answers as a conventional commit message.
///
/// A `|` in the body starts a new line; footers follow the body separated
/// by a blank line.
pub fn format_message(answers: &CommitAnswers) -> String {
    let mut message = header(
        answers.commit_type,
        answers.scope.as_deref(),
        &answers.subject,
    );

    if let Some(body) = answers.body.as_deref().filter(|b| !b.is_empty()) {
        let body = body
            .split('|')
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n");
        message.push_str("\n\n");
        message.push_str(&body);
    }

    let mut footers = Vec::new();
    if let Some(breaking) = answers.breaking.as_deref().filter(|b| !b.is_empty()) {
        footers.push(format!("BREAKING CHANGE: {}", breaking));
    }
    if let Some(issues) = answers.issues.as_deref().filter(|i| !i.is_empty()) {
        footers.push(issues.to_string());
    }
    if !footers.is_empty() {
        message.push_str("\n\n");
        message.push_str(&footers.join("\n"));
    }

    message
}

/// Subject must be present and keep the header within `max_len` chars.
pub fn validate_subject(
    subject: &str,
    commit_type: CommitType,
    scope: Option<&str>,
    max_len: usize,
) -> Result<(), String> {
    let subject = clean_subject(subject);
    if subject.is_empty() {
        return Err("Subject is required".to_string());
    }

    let len = header(commit_type, scope, &subject).chars().count();
    if len > max_len {
        return Err(format!(
            "Header is {} characters, limit is {} (shorten by {})",
            len,
            max_len,
            len - max_len
        ));
    }
    Ok(())
}

pub fn clean_subject(subject: &str) -> String {
    subject.trim().trim_end_matches('.').trim_end().to_string()
}

pub type ProseFilter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Cleanup for prose answers; auto-corrects when given a checker.
pub fn prose_filter(checker: Option<Arc<SpellChecker>>) -> ProseFilter {
    match checker {
        Some(checker) => Arc::new(move |text: &str| checker.auto_correct(text.trim())),
        None => Arc::new(|text: &str| text.trim().to_string()),
    }
}

/// Checks the subject as it will be committed, after `filter` has run.
pub fn subject_validator(
    filter: ProseFilter,
    commit_type: CommitType,
    scope: Option<String>,
    max_len: usize,
) -> impl Fn(&str) -> Result<(), String> + Send + Sync + 'static {
    move |subject: &str| validate_subject(&filter(subject), commit_type, scope.as_deref(), max_len)
}

fn optional(answer: String) -> Option<String> {
    let answer = answer.trim();
    if answer.is_empty() {
        None
    } else {
        Some(answer.to_string())
    }
}

/// Asks the commit questions on stderr.
pub struct Questionnaire<'a> {
    config: &'a Config,
    checker: Arc<SpellChecker>,
    term: Term,
    theme: ColorfulTheme,
}

impl<'a> Questionnaire<'a> {
    pub fn new(config: &'a Config, checker: Arc<SpellChecker>) -> Self {
        Self {
            config,
            checker,
            term: Term::stderr(),
            theme: ColorfulTheme::default(),
        }
    }

    pub async fn ask(&self) -> Result<CommitAnswers, PromptError> {
        if !self.term.is_term() {
            return Err(PromptError::NotATerminal);
        }

        let commit_type = self.select_type()?;

        let scope = self
            .input("Scope (optional, e.g. api):")
            .with_filter(|scope| scope.trim().to_lowercase())
            .run()
            .await
            .map(optional)?;

        let filter = self.prose_filter();
        let subject = self
            .input("Subject:")
            .with_validator(subject_validator(
                filter.clone(),
                commit_type,
                scope.clone(),
                self.config.max_header_length,
            ))
            .with_filter(move |subject| clean_subject(&filter(&subject)))
            .run()
            .await?;

        let body = self
            .free_text("Body (optional, use | for new lines):")
            .run()
            .await
            .map(optional)?;

        let breaking = if self.confirm("Are there any breaking changes?", false)? {
            let description = self
                .free_text("Describe the breaking change:")
                .with_validator(|text: &str| {
                    if text.trim().is_empty() {
                        Err("A description is required".to_string())
                    } else {
                        Ok(())
                    }
                })
                .run()
                .await?;
            optional(description)
        } else {
            None
        };

        let issues = self
            .input("Issue references (optional, e.g. closes #123):")
            .run()
            .await
            .map(optional)?;

        Ok(CommitAnswers {
            commit_type,
            scope,
            subject,
            body,
            breaking,
            issues,
        })
    }

    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool, PromptError> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_on_opt(&self.term)
            .map_err(dialog_error)?
            .ok_or(PromptError::Aborted)
    }

    fn select_type(&self) -> Result<CommitType, PromptError> {
        let labels: Vec<String> = CommitType::ALL.iter().map(|t| t.label()).collect();
        let index = Select::with_theme(&self.theme)
            .with_prompt("Select the type of change")
            .items(&labels)
            .default(0)
            .interact_on_opt(&self.term)
            .map_err(dialog_error)?
            .ok_or(PromptError::Aborted)?;
        Ok(CommitType::ALL[index])
    }

    /// Spell-checked input configured from the loaded config.
    fn input(&self, message: &str) -> SpellInput {
        let input = SpellInput::new(message)
            .with_debounce(self.config.debounce())
            .with_highlight(HighlightStyle::from_name(&self.config.highlight));

        if self.config.spell_check {
            input.with_checker(self.checker.clone())
        } else {
            input
        }
    }

    /// Input for prose, corrected on submit when auto-correct is enabled.
    fn free_text(&self, message: &str) -> SpellInput {
        let filter = self.prose_filter();
        self.input(message).with_filter(move |text| filter(&text))
    }

    fn prose_filter(&self) -> ProseFilter {
        prose_filter(self.config.auto_correct.then(|| self.checker.clone()))
    }
}

/// Ctrl-C while a dialoguer prompt is reading surfaces as an interrupted read.
fn dialog_error(e: dialoguer::Error) -> PromptError {
    match e {
        dialoguer::Error::IO(io) if io.kind() == io::ErrorKind::Interrupted => PromptError::Aborted,
        other => PromptError::Dialog(other),
    }
}

/// Run the whole flow: ask, preview, confirm and hand the message to git.
pub async fn run(config: &Config, checker: Arc<SpellChecker>, options: &CommitOptions) -> Result<()> {
    let questions = Questionnaire::new(config, checker);
    let answers = questions.ask().await?;
    let message = format_message(&answers);

    if options.dry_run {
        println!("{}", message);
        return Ok(());
    }

    output::print_commit_preview(&message);
    if !questions.confirm("Commit with this message?", true)? {
        eprintln!("Commit cancelled.");
        return Ok(());
    }

    run_git_commit(&message, &options.git_args)
}

/// Pipe `message` into `git commit -F -`.
pub fn run_git_commit(message: &str, extra_args: &[String]) -> Result<()> {
    log::debug!("Running git commit with extra args {:?}", extra_args);

    let mut child = Command::new("git")
        .args(["commit", "-F", "-"])
        .args(extra_args)
        .stdin(Stdio::piped())
        .spawn()
        .context("Failed to run git")?;

    {
        let mut stdin = child.stdin.take().context("Failed to open git stdin")?;
        stdin
            .write_all(message.as_bytes())
            .context("Failed to send commit message to git")?;
    }

    let status = child.wait().context("Failed to wait for git")?;
    if !status.success() {
        anyhow::bail!("git commit failed ({})", status);
    }
    Ok(())
}
