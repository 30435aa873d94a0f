//! Evolve command
//!
//! ```bash
//! coscientist rank --goal "..." --input reviewed.json --output ranked.json
//! coscientist evolve --goal "..." --input ranked.json
//! ```
//!
//! The three best-ranked hypotheses are refined from their reviews and the
//! best two are combined into a hybrid.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use comfy_table::{Cell, Color, Table};
use coscientist_agents::{EvolutionAgent, EvolvedHypothesis, RankedHypothesis};

use super::{parse_hypotheses, write_json, InputArgs};
use crate::context::Context;
use crate::output::truncate;

/// Arguments for the evolve command
#[derive(Debug, Args)]
pub struct EvolveArgs {
    /// Research goal the hypotheses address
    #[arg(short, long)]
    pub goal: String,

    /// Ranked hypotheses, as written by `rank --output`
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the evolved hypotheses to this file as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the evolve command
pub async fn execute(ctx: &Context, args: EvolveArgs) -> Result<()> {
    let ranked: Vec<RankedHypothesis> = parse_hypotheses(&args.input.read()?)?;
    let agent = EvolutionAgent::new(ctx.client()?, &ctx.config.llm);

    let spinner = ctx.output.spinner("Evolving top hypotheses...");
    let result = agent.evolve_top(&args.goal, &ranked).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let evolved = result.context("Evolution failed")?;

    if let Some(path) = &args.output {
        write_json(ctx, path, &evolved)?;
    }

    ctx.output.emit(&evolved, |evolved| println!("{}", evolution_table(evolved)))
}

fn parents_label(ranks: &[usize]) -> String {
    ranks
        .iter()
        .map(|rank| format!("#{rank}"))
        .collect::<Vec<_>>()
        .join(" + ")
}

fn evolution_table(evolved: &[EvolvedHypothesis]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("From").fg(Color::Cyan),
        Cell::new("Type").fg(Color::Cyan),
        Cell::new("Hypothesis").fg(Color::Cyan),
    ]);
    for item in evolved {
        table.add_row(vec![
            Cell::new(parents_label(&item.parent_ranks)),
            Cell::new(item.evolution_type.to_string()),
            Cell::new(truncate(&item.hypothesis.statement, 70)),
        ]);
    }
    table
}
