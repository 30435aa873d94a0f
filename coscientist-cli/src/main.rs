//! Co-Scientist CLI
//!
//! Command-line interface for generating, reviewing, ranking and refining
//! scientific hypotheses with the co-scientist agents.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod context;
mod output;

use cli::{Cli, Commands};
use config::Config;
use context::Context;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let config = Config::load()?;
    init_tracing(&config, &cli);

    // Create context
    let ctx = Context::new(&cli, config)?;

    // Execute command
    match cli.command {
        Commands::Validate(cmd) => commands::validate::execute(&ctx, cmd),
        Commands::Generate(args) => commands::generate::execute(&ctx, args).await,
        Commands::Review(args) => commands::review::execute(&ctx, args).await,
        Commands::Rank(args) => commands::rank::execute(&ctx, args).await,
        Commands::Evolve(args) => commands::evolve::execute(&ctx, args).await,
        Commands::Proximity(args) => commands::proximity::execute(&ctx, args).await,
        Commands::Report(args) => commands::report::execute(&ctx, args).await,
        Commands::Run(args) => commands::run::execute(&ctx, args).await,
        Commands::Agents(cmd) => commands::agents::execute(&ctx, cmd),
    }
}

/// Logs go to stderr so that JSON and YAML output on stdout stays parseable.
fn init_tracing(config: &Config, cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directives(cli.verbose)));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
