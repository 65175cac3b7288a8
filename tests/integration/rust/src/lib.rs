//! Integration test suite for the suite runner
//!
//! Exercises the profile registry, harness and CLI together across crate
//! boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use suite_cli;
    pub use suite_harness;
    pub use suite_profile;
}
