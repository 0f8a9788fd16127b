//! CLI command implementations for Connect Six.

pub(crate) mod cities;
pub(crate) mod play;
pub(crate) mod replay;

mod input;
mod output;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;

/// Output format for the `replay` and `cities` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Headquarters capture rule, as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum HqRuleArg {
    /// A headquarters falls when the enemy outnumbers its defenders.
    Contested,
    /// The player's headquarters falls after the first combat phase.
    Legacy,
}

impl From<HqRuleArg> for connect_six::HqCaptureRule {
    fn from(arg: HqRuleArg) -> Self {
        match arg {
            HqRuleArg::Contested => Self::Contested,
            HqRuleArg::Legacy => Self::Legacy,
        }
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<connect_six::SetupError> for CliError {
    fn from(e: connect_six::SetupError) -> Self {
        Self::new(format!("Invalid setup: {e}"))
    }
}

impl From<connect_six::EngineError> for CliError {
    fn from(e: connect_six::EngineError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<connect_six::ReplayError> for CliError {
    fn from(e: connect_six::ReplayError) -> Self {
        Self::new(e.to_string())
    }
}
