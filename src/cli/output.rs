use crate::checker::EngineStats;
use crate::{byte_offset, SpellFinding};
use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Findings for one checked input.
#[derive(Debug, Clone)]
pub struct Report {
    /// File name, `<args>` or `<stdin>`.
    pub source: String,
    pub text: String,
    pub findings: Vec<SpellFinding>,
}

#[derive(Debug, Serialize)]
struct JsonFinding<'a> {
    source: &'a str,
    line: usize,
    column: usize,
    word: &'a str,
    suggestions: &'a [String],
    context: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    inputs_checked: usize,
    total_findings: usize,
    findings: Vec<JsonFinding<'a>>,
}

/// Where a finding sits: 1-based line and column plus the line itself.
struct Location<'a> {
    line: usize,
    column: usize,
    context: &'a str,
    /// Char offset of the finding inside `context`.
    offset: usize,
}

fn locate<'a>(text: &'a str, finding: &SpellFinding) -> Location<'a> {
    let start = byte_offset(text, finding.span.start);
    let line_start = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = text[start..]
        .find('\n')
        .map(|i| start + i)
        .unwrap_or(text.len());
    let offset = text[line_start..start].chars().count();

    Location {
        line: text[..start].matches('\n').count() + 1,
        column: offset + 1,
        context: text[line_start..line_end].trim_end_matches('\r'),
        offset,
    }
}

pub fn print_reports(reports: &[Report], colored_output: bool, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for report in reports {
                print_text_findings(report, colored_output);
            }
            Ok(())
        }
        OutputFormat::Json => print_json_findings(reports),
    }
}

fn print_text_findings(report: &Report, colored_output: bool) {
    if report.findings.is_empty() {
        return;
    }

    if colored_output {
        println!("\n{}", report.source.bold().underline());
    } else {
        println!("\n{}", report.source);
    }

    for finding in &report.findings {
        let location = locate(&report.text, finding);
        let line_info = format!("{}:{}", location.line, location.column);

        if colored_output {
            println!(
                "  {} {} {}",
                line_info.blue().bold(),
                finding.word.red().bold(),
                format_context(&location, finding, colored_output)
            );

            if !finding.suggestions.is_empty() {
                let suggestions = finding
                    .suggestions
                    .iter()
                    .map(|s| s.green().to_string())
                    .collect::<Vec<_>>()
                    .join(&", ".dimmed().to_string());
                println!("    {} {}", "→".dimmed(), suggestions);
            }
        } else {
            println!("  {} {} {}", line_info, finding.word, location.context);

            if !finding.suggestions.is_empty() {
                println!("    → {}", finding.suggestions.join(", "));
            }
        }
    }
}

fn print_json_findings(reports: &[Report]) -> Result<()> {
    let findings: Vec<JsonFinding> = reports
        .iter()
        .flat_map(|report| {
            report.findings.iter().map(move |finding| {
                let location = locate(&report.text, finding);
                JsonFinding {
                    source: &report.source,
                    line: location.line,
                    column: location.column,
                    word: &finding.word,
                    suggestions: &finding.suggestions,
                    context: location.context,
                }
            })
        })
        .collect();

    let output = JsonOutput {
        inputs_checked: reports.len(),
        total_findings: findings.len(),
        findings,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// The finding's line with the misspelled word emphasised by position, so
/// an earlier correct occurrence of the same letters is left alone.
fn format_context(location: &Location, finding: &SpellFinding, colored: bool) -> String {
    if !colored {
        return location.context.to_string();
    }

    let context = location.context;
    let start = byte_offset(context, location.offset);
    let end = byte_offset(context, location.offset + finding.span.len());
    format!(
        "{}{}{}",
        &context[..start],
        context[start..end].red().bold(),
        &context[end..]
    )
}

pub fn print_check_summary(total_findings: usize, inputs: usize, colored: bool) {
    println!();
    if total_findings == 0 {
        if colored {
            println!("{}", "✓ No spelling errors found!".green().bold());
        } else {
            println!("✓ No spelling errors found!");
        }
    } else {
        let error_word = if total_findings == 1 { "error" } else { "errors" };
        let input_word = if inputs == 1 { "input" } else { "inputs" };
        if colored {
            println!(
                "{} {} {} found in {} {}",
                "✗".red().bold(),
                total_findings.to_string().red().bold(),
                error_word,
                inputs,
                input_word
            );
        } else {
            println!(
                "✗ {} {} found in {} {}",
                total_findings, error_word, inputs, input_word
            );
        }
    }
}

/// Corrected text goes to stdout untouched; the tally goes to stderr.
pub fn print_fix(corrected: &str, total_fixed: usize, colored: bool) {
    if corrected.ends_with('\n') {
        print!("{}", corrected);
    } else {
        println!("{}", corrected);
    }

    let fix_word = if total_fixed == 1 { "correction" } else { "corrections" };
    if total_fixed == 0 {
        if colored {
            eprintln!("{}", "No corrections needed!".green().bold());
        } else {
            eprintln!("No corrections needed!");
        }
    } else if colored {
        eprintln!(
            "{} {} {} applied",
            "✓".green().bold(),
            total_fixed.to_string().green().bold(),
            fix_word
        );
    } else {
        eprintln!("✓ {} {} applied", total_fixed, fix_word);
    }
}

pub fn print_stats(stats: &EngineStats, format: OutputFormat, colored: bool) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    let dictionary = if stats.has_dictionary {
        "loaded"
    } else {
        "unavailable (typo rules only)"
    };

    if colored {
        println!("{}", "Spelling engine".bold());
        let dictionary = if stats.has_dictionary {
            dictionary.green()
        } else {
            dictionary.yellow()
        };
        println!("  Dictionary:      {}", dictionary);
    } else {
        println!("Spelling engine");
        println!("  Dictionary:      {}", dictionary);
    }
    println!("  Typo rules:      {}", stats.typo_rule_count);
    println!("  Technical words: {}", stats.technical_word_count);

    Ok(())
}

/// Show the assembled commit message before asking to commit.
pub fn print_commit_preview(message: &str) {
    eprintln!();
    eprintln!("{}", "Commit message:".bold());
    eprintln!("{}", "─".repeat(40).dimmed());
    for line in message.lines() {
        eprintln!("{}", line.cyan());
    }
    eprintln!("{}", "─".repeat(40).dimmed());
    eprintln!();
}
