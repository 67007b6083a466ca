//! Output formatting utilities

use colored::*;
use icrc7_scenario::{ScenarioSummary, StepOutcome, StepStatus};
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for listings
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a vector of items in the specified format
pub fn print_output<T: Serialize + Tabled>(data: Vec<T>, format: OutputFormat) -> serde_json::Result<()> {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No results".dimmed());
            } else {
                println!("{}", Table::new(data));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
    }
    Ok(())
}

/// Print one step outcome as it completes
pub fn print_outcome(outcome: &StepOutcome) {
    if outcome.is_assertion_failure() {
        print_error(&outcome.to_string());
        return;
    }
    match &outcome.status {
        StepStatus::Section => {
            println!();
            println!("{}", outcome.to_string().bold());
        }
        StepStatus::Observed(_) => println!("  {}", outcome),
        StepStatus::Committed { .. } | StepStatus::Checked { .. } => print_success(&outcome.to_string()),
        StepStatus::Rejected { .. } => print_info(&outcome.to_string()),
        StepStatus::Skipped { .. } => print_warning(&outcome.to_string()),
    }
}

/// Print the end-of-run summary
pub fn print_summary(summary: &ScenarioSummary) {
    println!();
    if summary.passed() {
        print_success(&summary.to_string());
        return;
    }
    print_warning(&summary.to_string());
    for failure in &summary.assertion_failures {
        println!("    {}", failure.red());
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}
