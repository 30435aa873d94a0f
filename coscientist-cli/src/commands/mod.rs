//! CLI command implementations

pub mod agents;
pub mod evolve;
pub mod generate;
pub mod proximity;
pub mod rank;
pub mod report;
pub mod review;
pub mod run;
pub mod validate;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::context::Context;

/// Where to read a JSON document from.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input file path (JSON)
    #[arg(short, long, conflicts_with = "stdin")]
    pub input: Option<PathBuf>,

    /// Read input from stdin
    #[arg(long)]
    pub stdin: bool,
}

impl InputArgs {
    /// Read the raw input text.
    pub fn read(&self) -> Result<String> {
        if self.stdin {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        } else if let Some(path) = &self.input {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))
        } else {
            anyhow::bail!("Either --input or --stdin must be provided")
        }
    }
}

/// A bare JSON array, or an object holding it under `hypotheses`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HypothesisList<T> {
    Bare(Vec<T>),
    Wrapped { hypotheses: Vec<T> },
}

/// Parse a list of hypotheses in either accepted layout.
pub fn parse_hypotheses<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    let list: HypothesisList<T> =
        serde_json::from_str(json).context("Failed to parse hypotheses JSON")?;
    Ok(match list {
        HypothesisList::Bare(items) => items,
        HypothesisList::Wrapped { hypotheses } => hypotheses,
    })
}

/// Write `value` as pretty JSON to `path`.
pub fn write_json<T: Serialize>(ctx: &Context, path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write output to {}", path.display()))?;
    ctx.output
        .success(&format!("Output written to {}", path.display()));
    Ok(())
}
