//! Run command
//!
//! Full workflow for one research goal:
//!
//! ```bash
//! coscientist run --goal "To investigate how sleep affects memory" --count 4
//! coscientist run --goal "..." --iterations 1 --report-format research-brief
//! ```
//!
//! Goal and hypothesis validation issues are reported but never stop the
//! run.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::{Cell, Color, Table};
use coscientist_agents::{
    contracts::GenerationInput, Agent, RefinedHypothesis, ReportFormat, ResearchReport,
    Supervisor, SupervisorOptions,
};

use super::rank::ranking_table;
use super::write_json;
use crate::context::Context;
use crate::output::{print_field, print_section, truncate};

/// Arguments for the run command
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Research goal
    #[arg(short, long)]
    pub goal: String,

    /// Number of hypotheses (defaults to HYPOTHESIS_COUNT or 3)
    #[arg(short, long)]
    pub count: Option<usize>,

    /// Refinement iterations (defaults to REFINEMENT_ITERATIONS or 3)
    #[arg(long)]
    pub iterations: Option<usize>,

    /// scientific-report, grant-proposal or research-brief
    #[arg(long, default_value = "scientific-report")]
    pub report_format: ReportFormat,

    /// Write the full report to this file as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the run command
pub async fn execute(ctx: &Context, args: RunArgs) -> Result<()> {
    let supervisor =
        Supervisor::new(ctx.client()?, &ctx.config.llm).with_options(SupervisorOptions {
            refinement_iterations: args
                .iterations
                .unwrap_or(ctx.config.refinement_iterations),
            report_format: args.report_format,
        });
    let input = GenerationInput {
        research_goal: args.goal,
        count: args.count.unwrap_or(ctx.config.hypothesis_count),
    };

    let spinner = ctx.output.spinner("Generating, reviewing, ranking and refining hypotheses...");
    let result = supervisor.invoke(input).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let report = result.context("Research run failed")?;

    if let Some(path) = &args.output {
        write_json(ctx, path, &report)?;
    }

    ctx.output.emit(&report, print_report)
}

fn print_report(report: &ResearchReport) {
    print_section("Research Goal");
    println!("  {}", report.research_goal);
    for issue in &report.goal_validation.issues {
        println!("    {} {}", "•".yellow(), issue);
    }

    let flagged: Vec<(usize, &str)> = report
        .hypothesis_validations
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_valid)
        .map(|(i, v)| (i + 1, v.issues.first().map(String::as_str).unwrap_or_default()))
        .collect();
    if !flagged.is_empty() {
        print_section("Validation Warnings");
        for (number, first_issue) in flagged {
            println!("    {} hypothesis {number}: {}", "•".yellow(), truncate(first_issue, 80));
        }
    }

    print_section("Ranking");
    println!("{}", ranking_table(&report.ranked));

    print_section("Refined Hypotheses");
    println!("{}", refinement_table(&report.refined));

    print_section(&report.final_report.title);
    println!("{}", report.final_report.report);

    let elapsed = report.completed_at - report.started_at;
    print_field("Hypotheses", &report.ranked.len().to_string());
    print_field(
        "Duration",
        &format!("{:.1}s", elapsed.num_milliseconds() as f64 / 1000.0),
    );
}

/// Iteration and proximity of each refined hypothesis.
fn refinement_label(refined: &RefinedHypothesis) -> String {
    match &refined.proximity {
        Some(proximity) if refined.iteration > 0 => format!(
            "iteration {} ({:.0}/10)",
            refined.iteration, proximity.proximity_score
        ),
        _ => "unchanged".to_string(),
    }
}

fn refinement_table(refined: &[RefinedHypothesis]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Rank").fg(Color::Cyan),
        Cell::new("Hypothesis").fg(Color::Cyan),
        Cell::new("Refinement").fg(Color::Cyan),
    ]);
    for item in refined {
        table.add_row(vec![
            Cell::new(item.original_rank),
            Cell::new(truncate(&item.hypothesis.statement, 70)),
            Cell::new(refinement_label(item)),
        ]);
    }
    table
}
