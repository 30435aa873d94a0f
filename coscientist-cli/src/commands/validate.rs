//! Validate commands
//!
//! ```bash
//! coscientist validate goal "To investigate the effect of sleep on memory"
//! coscientist validate hypothesis "Sleep deprivation decreases recall accuracy"
//! ```
//!
//! The command fails when the text is rejected (two or more issues), so it
//! can gate scripts.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use coscientist_agents::{validate_hypothesis, validate_research_goal, ValidationReport};

use crate::context::Context;
use crate::output::{print_field, print_section};

/// Lexical validation commands
#[derive(Debug, Args)]
pub struct ValidateCommands {
    #[command(subcommand)]
    pub command: ValidateSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ValidateSubcommand {
    /// Check a research goal
    Goal {
        /// Research goal text
        text: String,
    },

    /// Check a hypothesis statement
    #[command(alias = "hyp")]
    Hypothesis {
        /// Hypothesis text
        text: String,
    },
}

/// Execute validate commands
pub fn execute(ctx: &Context, cmd: ValidateCommands) -> Result<()> {
    let (kind, report) = match &cmd.command {
        ValidateSubcommand::Goal { text } => ("Research goal", validate_research_goal(text)),
        ValidateSubcommand::Hypothesis { text } => ("Hypothesis", validate_hypothesis(text)),
    };

    ctx.output.emit(&report, |report| print_report(kind, report))?;

    if !report.is_valid {
        anyhow::bail!("{kind} failed validation with {} issues", report.issues.len());
    }
    Ok(())
}

fn print_report(kind: &str, report: &ValidationReport) {
    print_section(&format!("{kind} Validation"));

    let verdict = if report.is_valid {
        "valid".green().bold()
    } else {
        "invalid".red().bold()
    };
    print_field("Result", &verdict.to_string());
    print_field("Issues", &report.issues.len().to_string());

    for issue in &report.issues {
        println!("    {} {}", "•".yellow(), issue);
    }
}
