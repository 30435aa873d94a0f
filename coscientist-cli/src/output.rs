//! Output formatting utilities

use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and sections
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Console output settings shared by all commands.
#[derive(Debug, Clone)]
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print `value` as JSON or YAML, or call `table` for the table format.
    pub fn emit<T: Serialize>(&self, value: &T, table: impl FnOnce(&T)) -> Result<()> {
        match self.format {
            OutputFormat::Table => table(value),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        }
        Ok(())
    }

    /// Spinner on stderr, only for the table format so that machine output
    /// stays clean.
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if self.format != OutputFormat::Table {
            return None;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    }

    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".blue(), message);
    }
}

/// Print a section heading
pub fn print_section(title: &str) {
    println!();
    println!("{}", title.bold().cyan());
    println!("{}", "─".repeat(title.chars().count().max(20)).dimmed());
}

/// Print a labelled field
pub fn print_field(label: &str, value: &str) {
    println!("  {:<18} {}", format!("{label}:").bold(), value);
}

/// Shorten `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
