//! Error types for the CLI

use suite_harness::HarnessError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration, profile or discovery failure
    #[error(transparent)]
    Harness(#[from] HarnessError),

    /// Report could not be rendered
    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        2
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
