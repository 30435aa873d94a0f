//! Proximity command
//!
//! ```bash
//! coscientist proximity --goal "..." --input hypotheses.json --threshold 6
//! ```

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use comfy_table::{Cell, Color, Table};
use coscientist_agents::agents::filter_relevant;
use coscientist_agents::{HypothesisRecord, ProximityAgent, ScreenedHypothesis};

use super::{parse_hypotheses, write_json, InputArgs};
use crate::context::Context;
use crate::output::truncate;

/// Arguments for the proximity command
#[derive(Debug, Args)]
pub struct ProximityArgs {
    /// Research goal to measure against
    #[arg(short, long)]
    pub goal: String,

    #[command(flatten)]
    pub input: InputArgs,

    /// Keep only hypotheses scoring at least this much (1-10)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Write the assessments to this file as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the proximity command
pub async fn execute(ctx: &Context, args: ProximityArgs) -> Result<()> {
    let hypotheses: Vec<HypothesisRecord> = parse_hypotheses(&args.input.read()?)?;
    let agent = ProximityAgent::new(ctx.client()?, &ctx.config.llm);

    let spinner = ctx
        .output
        .spinner(&format!("Scoring {} hypotheses...", hypotheses.len()));
    let result = agent.evaluate_all(&args.goal, &hypotheses).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let mut screened = result.context("Proximity evaluation failed")?;

    if let Some(threshold) = args.threshold {
        let total = screened.len();
        screened = filter_relevant(screened, threshold);
        ctx.output
            .info(&format!("{} of {total} hypotheses kept", screened.len()));
    }

    if let Some(path) = &args.output {
        write_json(ctx, path, &screened)?;
    }

    ctx.output.emit(&screened, |screened| println!("{}", proximity_table(screened)))
}

fn proximity_table(screened: &[ScreenedHypothesis]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Hypothesis").fg(Color::Cyan),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Relevant").fg(Color::Cyan),
    ]);
    for (i, item) in screened.iter().enumerate() {
        let relevant = if item.proximity.is_relevant {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(truncate(&item.hypothesis.statement, 70)),
            Cell::new(format!("{:.1}", item.proximity.proximity_score)),
            relevant,
        ]);
    }
    table
}
