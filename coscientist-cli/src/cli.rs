//! CLI argument parsing

use clap::{Parser, Subcommand};

use crate::commands::{
    agents::AgentsCommands, evolve::EvolveArgs, generate::GenerateArgs, proximity::ProximityArgs,
    rank::RankArgs, report::ReportArgs, review::ReviewArgs, run::RunArgs,
    validate::ValidateCommands,
};
use crate::output::OutputFormat;

/// Co-Scientist CLI
///
/// Generate, review, rank and refine scientific hypotheses for a research
/// goal with a team of language model agents.
#[derive(Parser, Debug)]
#[command(name = "coscientist")]
#[command(author = "Co-Scientist Team")]
#[command(version)]
#[command(about = "AI co-scientist for hypothesis generation and review", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (table, json, yaml)
    #[arg(short, long, global = true, default_value = "table", env = "COSCIENTIST_FORMAT")]
    pub format: OutputFormat,

    /// Model name for all agents
    #[arg(long, global = true, env = "MODEL_NAME")]
    pub model: Option<String>,

    /// OpenAI-compatible API root
    #[arg(long, global = true, env = "OPENAI_BASE_URL")]
    pub base_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run lexical checks on a research goal or hypothesis
    #[command(alias = "check")]
    Validate(ValidateCommands),

    /// Generate hypotheses for a research goal
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Peer-review hypotheses from a JSON file
    Review(ReviewArgs),

    /// Rank reviewed hypotheses from a JSON file
    Rank(RankArgs),

    /// Refine the top ranked hypotheses and combine the best two
    Evolve(EvolveArgs),

    /// Score how closely hypotheses stay on the research goal
    Proximity(ProximityArgs),

    /// Write a research report over ranked hypotheses
    Report(ReportArgs),

    /// Run the full workflow, from generation to the final report
    Run(RunArgs),

    /// Show the available agents
    #[command(alias = "agent")]
    Agents(AgentsCommands),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_review_with_global_format() {
        let cli = Cli::try_parse_from([
            "coscientist",
            "review",
            "--goal",
            "To test",
            "--input",
            "hyps.json",
            "-f",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Review(args) => {
                assert_eq!(args.goal, "To test");
                assert_eq!(args.input.input.unwrap().to_str(), Some("hyps.json"));
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_run_refinement_options() {
        let cli = Cli::try_parse_from([
            "coscientist",
            "run",
            "-g",
            "To explore tides",
            "--iterations",
            "1",
            "--report-format",
            "research-brief",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.iterations, Some(1));
                assert_eq!(args.report_format, coscientist_agents::ReportFormat::ResearchBrief);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_report_format_is_rejected() {
        let result = Cli::try_parse_from([
            "coscientist",
            "report",
            "-g",
            "To explore tides",
            "-i",
            "ranked.json",
            "--report-format",
            "poster",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_validate_goal() {
        let cli =
            Cli::try_parse_from(["coscientist", "validate", "goal", "To explore tides"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate(_)));
    }
}
