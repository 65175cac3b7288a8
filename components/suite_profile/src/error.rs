//! Error types for profile resolution

use thiserror::Error;

/// Errors raised while resolving profiles or compiling include patterns
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// Requested profile name is not one of the known profiles
    #[error("profile not found: '{0}' (expected one of: unit, integration)")]
    NotFound(String),

    /// Include pattern could not be compiled
    #[error("invalid include pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending glob
        pattern: String,
        /// Why it was rejected
        reason: String,
    },

    /// Environment tag is not recognized
    #[error("unknown environment: '{0}'")]
    UnknownEnvironment(String),
}

/// Result type for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;
