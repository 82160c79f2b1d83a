//! Printing invocations for consumption by shells and scripts.

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::domain::model::ArgVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One invocation per line, arguments separated by a single space.
    #[default]
    Plain,
    /// A JSON array holding one array of arguments per invocation.
    Json,
}

/// Render invocations without any quoting or escaping.
pub fn render(parts: &[ArgVector], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(parts
            .iter()
            .map(|part| part.args().join(" "))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => {
            serde_json::to_string_pretty(parts).context("failed to serialize invocations")
        }
    }
}
