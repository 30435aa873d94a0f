//! Generate command
//!
//! ```bash
//! coscientist generate --goal "To investigate soil microbiome resilience" --count 5
//! ```

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use comfy_table::{Cell, Color, Table};
use coscientist_agents::{contracts::GenerationInput, Agent, GenerationAgent, HypothesisRecord};

use super::write_json;
use crate::context::Context;
use crate::output::truncate;

/// Arguments for the generate command
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Research goal
    #[arg(short, long)]
    pub goal: String,

    /// Number of hypotheses (defaults to HYPOTHESIS_COUNT or 3)
    #[arg(short, long)]
    pub count: Option<usize>,

    /// Write the hypotheses to this file as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the generate command
pub async fn execute(ctx: &Context, args: GenerateArgs) -> Result<()> {
    let agent = GenerationAgent::new(ctx.client()?, &ctx.config.llm);
    let input = GenerationInput {
        research_goal: args.goal,
        count: args.count.unwrap_or(ctx.config.hypothesis_count),
    };

    let spinner = ctx.output.spinner("Generating hypotheses...");
    let result = agent.invoke(input).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let hypotheses = result.context("Hypothesis generation failed")?;

    if let Some(path) = &args.output {
        write_json(ctx, path, &hypotheses)?;
    }

    ctx.output.emit(&hypotheses, |hypotheses| print_table(hypotheses))
}

fn print_table(hypotheses: &[HypothesisRecord]) {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Hypothesis").fg(Color::Cyan),
        Cell::new("Rationale").fg(Color::Cyan),
    ]);
    for (index, hypothesis) in hypotheses.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(truncate(&hypothesis.statement, 80)),
            Cell::new(truncate(&hypothesis.rationale, 60)),
        ]);
    }
    println!("{table}");
}
