//! Report command
//!
//! ```bash
//! coscientist report --goal "..." --input ranked.json --report-format grant-proposal
//! ```
//!
//! Writes a meta-review report over the five best-ranked hypotheses.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use coscientist_agents::agents::EXECUTIVE_SUMMARY_CHARS;
use coscientist_agents::{
    AgentRuntimeError, MetaReviewAgent, MetaReviewReport, RankedHypothesis, RefinedHypothesis,
    ReportFormat,
};
use serde::Serialize;

use super::{parse_hypotheses, write_json, InputArgs};
use crate::context::Context;
use crate::output::{print_field, print_section};

/// Arguments for the report command
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Research goal the hypotheses address
    #[arg(short, long)]
    pub goal: String,

    /// Ranked hypotheses, as written by `rank --output`
    #[command(flatten)]
    pub input: InputArgs,

    /// scientific-report, grant-proposal or research-brief
    #[arg(long, default_value = "scientific-report")]
    pub report_format: ReportFormat,

    /// Also request an executive summary
    #[arg(long)]
    pub summary: bool,

    /// Write the report to this file as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ReportView {
    #[serde(flatten)]
    report: MetaReviewReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    executive_summary: Option<String>,
}

/// Best rank first.
fn report_input(mut ranked: Vec<RankedHypothesis>) -> Vec<RefinedHypothesis> {
    ranked.sort_by_key(|r| r.rank);
    ranked.iter().map(RefinedHypothesis::from_ranked).collect()
}

/// Execute the report command
pub async fn execute(ctx: &Context, args: ReportArgs) -> Result<()> {
    let ranked: Vec<RankedHypothesis> = parse_hypotheses(&args.input.read()?)?;
    let agent = MetaReviewAgent::new(ctx.client()?, &ctx.config.llm);

    let spinner = ctx.output.spinner(&format!("Writing {}...", args.report_format));
    let result = agent
        .generate_report(&args.goal, &report_input(ranked), args.report_format)
        .await;
    let result = match result {
        Ok(report) if args.summary => agent
            .executive_summary(&report, EXECUTIVE_SUMMARY_CHARS)
            .await
            .map(|summary| (report, Some(summary)))
            .map_err(AgentRuntimeError::from),
        other => other.map(|report| (report, None)),
    };
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let (report, executive_summary) = result.context("Report generation failed")?;

    let view = ReportView {
        report,
        executive_summary,
    };
    if let Some(path) = &args.output {
        write_json(ctx, path, &view)?;
    }

    ctx.output.emit(&view, |view| {
        print_section(&view.report.title);
        print_field("Format", &view.report.format.to_string());
        print_field("Hypotheses", &view.report.hypothesis_count.to_string());
        if let Some(summary) = &view.executive_summary {
            print_section("Executive Summary");
            println!("{summary}");
        }
        print_section("Report");
        println!("{}", view.report.report);
    })
}
