//! Error types for the harness

use std::path::PathBuf;
use suite_profile::ProfileError;
use thiserror::Error;

/// Errors that stop a run or a single file from loading
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Profile could not be resolved
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// Runner configuration is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// File could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Test file manifest is missing or malformed
    #[error("invalid test manifest in {}: {reason}", .path.display())]
    Manifest {
        /// Offending test file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;
