//! Review command
//!
//! ```bash
//! coscientist review --goal "To investigate sleep and memory" --input hypotheses.json
//! ```
//!
//! The input is a JSON array of hypothesis records, or an object holding the
//! array under `hypotheses`. Each record needs a `statement` (or
//! `hypothesis`); the other fields may be missing.
//!
//! By default the batch stops at the first failed review. With
//! `--keep-going` every hypothesis is attempted and failures are reported
//! alongside the successful reviews.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::{Cell, Color, Table};
use coscientist_agents::{HypothesisRecord, ReflectionAgent, ReviewedHypothesis};

use super::{parse_hypotheses, write_json, InputArgs};
use crate::context::Context;
use crate::output::truncate;

/// Arguments for the review command
#[derive(Debug, Args)]
pub struct ReviewArgs {
    /// Research goal the hypotheses address
    #[arg(short, long)]
    pub goal: String,

    #[command(flatten)]
    pub input: InputArgs,

    /// Write the reviewed hypotheses to this file as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Review every hypothesis even after a failure
    #[arg(long)]
    pub keep_going: bool,
}

/// Execute the review command
pub async fn execute(ctx: &Context, args: ReviewArgs) -> Result<()> {
    let hypotheses: Vec<HypothesisRecord> = parse_hypotheses(&args.input.read()?)?;
    let agent = ReflectionAgent::new(ctx.client()?, &ctx.config.llm);

    let spinner = ctx
        .output
        .spinner(&format!("Reviewing {} hypotheses...", hypotheses.len()));
    let result = if args.keep_going {
        let results = agent.review_each(&args.goal, &hypotheses).await;
        let mut reviewed = Vec::with_capacity(results.len());
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(r) => reviewed.push(r),
                Err(e) => ctx
                    .output
                    .warn(&format!("Review of hypothesis {} failed: {e}", index + 1)),
            }
        }
        Ok(reviewed)
    } else {
        agent.review_all(&args.goal, &hypotheses).await
    };
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let reviewed = result.context("Review failed")?;

    if let Some(path) = &args.output {
        write_json(ctx, path, &reviewed)?;
    }

    ctx.output.emit(&reviewed, |reviewed| print_table(reviewed))
}

fn print_table(reviewed: &[ReviewedHypothesis]) {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Hypothesis").fg(Color::Cyan),
        Cell::new("Valid").fg(Color::Cyan),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Concerns").fg(Color::Cyan),
    ]);

    for (index, item) in reviewed.iter().enumerate() {
        let summary = &item.assessment_summary;
        let valid = if summary.valid {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Red)
        };

        let mut concerns = Vec::new();
        if summary.ethical_concerns {
            concerns.push("ethical");
        }
        if summary.practical_limitations {
            concerns.push("practical");
        }

        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(truncate(&item.hypothesis.statement, 70)),
            valid,
            Cell::new(format!("{:.2}", summary.overall_score)),
            Cell::new(if concerns.is_empty() {
                "-".to_string()
            } else {
                concerns.join(", ")
            }),
        ]);
    }

    println!("{table}");
    println!(
        "{}",
        "Scores are a lexical estimate from the review text.".dimmed()
    );
}
