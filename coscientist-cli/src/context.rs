//! Command execution context

use anyhow::{Context as _, Result};
use coscientist_agents::OpenAiClient;
use tracing::debug;

use crate::cli::Cli;
use crate::config::Config;
use crate::output::Output;

/// Shared state handed to every command.
pub struct Context {
    pub config: Config,
    pub output: Output,
}

impl Context {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn new(cli: &Cli, mut config: Config) -> Result<Self> {
        if let Some(model) = &cli.model {
            config.llm.model = model.clone();
        }
        if let Some(base_url) = &cli.base_url {
            config.llm = config
                .llm
                .with_base_url(base_url)
                .context("Invalid --base-url")?;
        }

        debug!(
            model = %config.llm.model,
            base_url = %config.llm.base_url,
            "Configuration loaded"
        );

        Ok(Self {
            config,
            output: Output::new(cli.format, cli.no_color),
        })
    }

    /// Completion client for the configured endpoint.
    pub fn client(&self) -> Result<OpenAiClient> {
        if self.config.llm.api_key.is_none() {
            self.output
                .warn("OPENAI_API_KEY is not set; requests are sent without authentication");
        }
        OpenAiClient::new(self.config.llm.clone()).context("Failed to create completion client")
    }
}
