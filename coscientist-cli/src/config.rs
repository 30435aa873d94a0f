//! Configuration for the coscientist CLI
//!
//! Loaded from environment variables. Command-line flags override the
//! values read here.
//!
//! Environment variables:
//! - OPENAI_API_KEY: API key for the completion endpoint
//! - OPENAI_BASE_URL: OpenAI-compatible endpoint (default https://api.openai.com/v1/)
//! - MODEL_NAME: model for all agents (default gpt-3.5-turbo)
//! - MAX_TOKENS: completion token limit (default 4000)
//! - LLM_TIMEOUT_SECS: request timeout (default 30)
//! - COSCIENTIST_LOG_LEVEL: log level for the coscientist crates (default info)
//! - HYPOTHESIS_COUNT: hypotheses to generate when --count is absent (default 3)
//! - REFINEMENT_ITERATIONS: refinement iterations when --iterations is absent (default 3)

use std::env;
use std::str::FromStr;

use anyhow::{Context as _, Result};
use coscientist_agents::agents::DEFAULT_REFINEMENT_ITERATIONS;
use coscientist_agents::LlmConfig;

/// Default number of hypotheses to generate.
pub const DEFAULT_HYPOTHESIS_COUNT: usize = 3;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Completion client settings
    pub llm: LlmConfig,

    /// Log level for the coscientist crates
    pub log_level: String,

    /// Hypotheses to generate by default
    pub hypothesis_count: usize,

    /// Refinement iterations of a full run by default
    pub refinement_iterations: usize,
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let llm = LlmConfig::from_env().context("Invalid completion client configuration")?;

        Ok(Self {
            llm,
            log_level: env::var("COSCIENTIST_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            hypothesis_count: parse_or(
                env::var("HYPOTHESIS_COUNT").ok(),
                DEFAULT_HYPOTHESIS_COUNT,
            ),
            refinement_iterations: parse_or(
                env::var("REFINEMENT_ITERATIONS").ok(),
                DEFAULT_REFINEMENT_ITERATIONS,
            ),
        })
    }

    /// Tracing filter directives when `RUST_LOG` is not set.
    pub fn filter_directives(&self, verbose: bool) -> String {
        let level = if verbose { "debug" } else { self.log_level.as_str() };
        format!("coscientist={level},coscientist_agents={level},warn")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(log_level: &str) -> Config {
        Config {
            llm: LlmConfig::default(),
            log_level: log_level.to_string(),
            hypothesis_count: DEFAULT_HYPOTHESIS_COUNT,
            refinement_iterations: DEFAULT_REFINEMENT_ITERATIONS,
        }
    }

    #[test]
    fn test_filter_directives() {
        assert_eq!(
            config("info").filter_directives(false),
            "coscientist=info,coscientist_agents=info,warn"
        );
        assert_eq!(
            config("info").filter_directives(true),
            "coscientist=debug,coscientist_agents=debug,warn"
        );
    }

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(parse_or(Some(" 5 ".to_string()), 3usize), 5);
        assert_eq!(parse_or(Some("five".to_string()), 3usize), 3);
        assert_eq!(parse_or(None, 3usize), 3);
    }
}
