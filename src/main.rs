use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use spellcommit::cli::commit::{self, CommitOptions};
use spellcommit::cli::output::{self, OutputFormat, Report};
use spellcommit::config::Overrides;
use spellcommit::prompt::abort_session;
use spellcommit::{dict, Config, PromptError, SpellChecker};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "spellcommit")]
#[command(
    version,
    about = "Write conventional commit messages with live spell-checking",
    long_about = None
)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Check typo rules and technical words only, without a dictionary
    #[arg(long, global = true)]
    no_dictionary: bool,

    /// Dictionary file to use instead of the installed one
    #[arg(long, global = true, value_name = "PATH")]
    dictionary: Option<PathBuf>,

    /// Language/dictionary to use (e.g., en_US, en_GB)
    #[arg(short, long, global = true)]
    language: Option<String>,

    /// Personal dictionary file
    #[arg(long, global = true, value_name = "PATH")]
    personal_dict: Option<PathBuf>,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a conventional commit message interactively (default)
    Commit(CommitArgs),
    /// Report misspellings in text
    Check {
        #[command(flatten)]
        input: InputArgs,

        /// Output format (text, json)
        #[arg(short = 'o', long, default_value = "text")]
        format: OutputFormat,

        /// Exit with code 0 even if errors are found
        #[arg(long)]
        no_fail: bool,
    },
    /// Print text with every misspelling replaced by its best suggestion
    Fix {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Show what the spelling engine has loaded
    Stats {
        /// Output format (text, json)
        #[arg(short = 'o', long, default_value = "text")]
        format: OutputFormat,
    },
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Args, Debug, Default)]
struct CommitArgs {
    /// Print the message instead of committing
    #[arg(long)]
    dry_run: bool,

    /// Disable live spell-checking in the prompts
    #[arg(long)]
    no_spell_check: bool,

    /// Apply the best suggestion to free-text answers
    #[arg(long)]
    auto_correct: bool,

    /// Extra arguments for `git commit`
    #[arg(last = true, value_name = "GIT_ARGS")]
    git_args: Vec<String>,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Text to check; words are joined with spaces
    #[arg(value_name = "TEXT")]
    text: Vec<String>,

    /// Read text from a file
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum DictCommands {
    /// List installed dictionaries
    List,
    /// Download a dictionary
    Download {
        /// Language code (e.g., en_US, en_GB)
        language: String,
    },
    /// Show dictionary info
    Info {
        /// Language code
        language: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "spellcommit", &mut io::stdout());
        return Ok(());
    }

    if cli.no_color {
        colored::control::set_override(false);
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    let colored_output = !cli.no_color;

    let mut overrides = Overrides {
        language: cli.language.clone(),
        personal_dictionary: cli.personal_dict.clone(),
        dictionary_path: cli.dictionary.clone(),
        no_dictionary: cli.no_dictionary,
        ..Default::default()
    };

    match cli.command.unwrap_or(Commands::Commit(CommitArgs::default())) {
        Commands::Commit(args) => {
            overrides.no_spell_check = args.no_spell_check;
            overrides.auto_correct = args.auto_correct;
            let config = Config::load(overrides)?;
            run_commit(&config, args)
        }
        Commands::Check {
            input,
            format,
            no_fail,
        } => {
            let config = Config::load(overrides)?;
            let checker = SpellChecker::new(&config)?;

            let reports: Vec<Report> = read_inputs(input)?
                .into_iter()
                .map(|(source, text)| Report {
                    findings: checker.check(&text),
                    source,
                    text,
                })
                .collect();
            let total_findings: usize = reports.iter().map(|r| r.findings.len()).sum();

            output::print_reports(&reports, colored_output, format)?;
            if format == OutputFormat::Text {
                output::print_check_summary(total_findings, reports.len(), colored_output);
            }

            if total_findings > 0 && !no_fail {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Fix { input } => {
            let config = Config::load(overrides)?;
            let checker = SpellChecker::new(&config)?;

            for (_, text) in read_inputs(input)? {
                let total_fixed = checker
                    .check(&text)
                    .iter()
                    .filter(|f| !f.suggestions.is_empty())
                    .count();
                output::print_fix(&checker.auto_correct(&text), total_fixed, colored_output);
            }
            Ok(())
        }
        Commands::Stats { format } => {
            let config = Config::load(overrides)?;
            let checker = SpellChecker::new(&config)?;
            output::print_stats(&checker.stats(), format, colored_output)
        }
        Commands::Dict { action } => match action {
            DictCommands::List => dict::manager::list_dictionaries(),
            DictCommands::Download { language } => dict::manager::download_dictionary(&language),
            DictCommands::Info { language } => dict::manager::show_info(&language),
        },
    }
}

fn run_commit(config: &Config, args: CommitArgs) -> Result<()> {
    let checker = Arc::new(SpellChecker::new(config)?);
    let options = CommitOptions {
        dry_run: args.dry_run,
        git_args: args.git_args,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start async runtime")?;
    let result = runtime.block_on(commit::run(config, checker, &options));

    if let Err(e) = &result {
        if matches!(e.downcast_ref::<PromptError>(), Some(PromptError::Aborted)) {
            // Terminal is already restored; the prompts have returned
            abort_session();
        }
    }
    result
}

/// Positional text, then `--file`, falling back to stdin when neither is given.
fn read_inputs(input: InputArgs) -> Result<Vec<(String, String)>> {
    let mut inputs = Vec::new();

    if !input.text.is_empty() {
        inputs.push(("<args>".to_string(), input.text.join(" ")));
    }

    if let Some(path) = input.file {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        inputs.push((path.display().to_string(), text));
    }

    if inputs.is_empty() {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        inputs.push(("<stdin>".to_string(), text));
    }

    Ok(inputs)
}
