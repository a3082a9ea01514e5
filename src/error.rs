//! Step error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced at the crate edge: configuration loading and
/// default-configuration materialization.
///
/// The orchestration chain itself never returns these; every runtime
/// failure there resolves to a [`BuildOutcome::Failure`] instead.
///
/// [`BuildOutcome::Failure`]: crate::BuildOutcome::Failure
#[derive(Error, Debug)]
pub enum StepError {
    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to write default configuration {}: {source}", .path.display())]
    TemplateWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
