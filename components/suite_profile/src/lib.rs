//! Suite Profiles
//!
//! Named bundles of test-execution settings. A profile decides which files
//! count as test files, which environment they run in, and how long hooks
//! and test bodies may take before they are failed with a timeout.
//!
//! Two profiles exist, `unit` (the default) and `integration`. They are
//! built once and never change for the lifetime of the process.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod pattern;
pub mod profile;
pub mod registry;

pub use error::{ProfileError, ProfileResult};
pub use pattern::IncludePattern;
pub use profile::{Environment, ProfileName, SuiteProfile};
pub use registry::{default_profile, profiles, resolve, ProfileRegistry};
