//! Rank command
//!
//! ```bash
//! coscientist review --goal "..." --input hypotheses.json --output reviewed.json
//! coscientist rank --goal "..." --input reviewed.json
//! ```
//!
//! Up to five hypotheses are ranked by pairwise tournament, larger sets by
//! per-criterion scoring.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use comfy_table::{Cell, Color, Table};
use coscientist_agents::{RankedHypothesis, RankingAgent, RankingEvidence, ReviewedHypothesis};

use super::{parse_hypotheses, write_json, InputArgs};
use crate::context::Context;
use crate::output::truncate;

/// Arguments for the rank command
#[derive(Debug, Args)]
pub struct RankArgs {
    /// Research goal the hypotheses address
    #[arg(short, long)]
    pub goal: String,

    #[command(flatten)]
    pub input: InputArgs,

    /// Write the ranking to this file as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the rank command
pub async fn execute(ctx: &Context, args: RankArgs) -> Result<()> {
    let hypotheses: Vec<ReviewedHypothesis> = parse_hypotheses(&args.input.read()?)?;
    let agent = RankingAgent::new(ctx.client()?, &ctx.config.llm);

    let spinner = ctx
        .output
        .spinner(&format!("Ranking {} hypotheses...", hypotheses.len()));
    let result = agent.rank(&args.goal, hypotheses).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let ranked = result.context("Ranking failed")?;

    if let Some(path) = &args.output {
        write_json(ctx, path, &ranked)?;
    }

    ctx.output.emit(&ranked, |ranked| println!("{}", ranking_table(ranked)))
}

/// How a hypothesis earned its rank, in one cell.
pub(crate) fn evidence_label(evidence: &RankingEvidence) -> String {
    match evidence {
        RankingEvidence::Tournament {
            wins,
            total_comparisons,
        } => format!("{wins}/{total_comparisons} wins"),
        RankingEvidence::Scoring {
            scores,
            overall_score,
            ..
        } => format!("{overall_score:.1}/10 ({} criteria)", scores.len()),
    }
}

/// Ranking table, best first.
pub(crate) fn ranking_table(ranked: &[RankedHypothesis]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Rank").fg(Color::Cyan),
        Cell::new("Hypothesis").fg(Color::Cyan),
        Cell::new("Result").fg(Color::Cyan),
        Cell::new("Review Score").fg(Color::Cyan),
    ]);

    for item in ranked {
        let rank = if item.rank == 1 {
            Cell::new(item.rank).fg(Color::Green)
        } else {
            Cell::new(item.rank)
        };
        table.add_row(vec![
            rank,
            Cell::new(truncate(&item.hypothesis.hypothesis.statement, 70)),
            Cell::new(evidence_label(&item.evidence)),
            Cell::new(format!(
                "{:.2}",
                item.hypothesis.assessment_summary.overall_score
            )),
        ]);
    }

    table
}
