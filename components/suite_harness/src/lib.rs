//! Suite Harness
//!
//! Discovers the test files selected by a suite profile, loads each one into
//! a [`TestModule`], and runs its hooks and test bodies under the profile's
//! wall-clock ceilings. Failures are attributed to the smallest unit (one
//! hook or one test) and never stop unrelated files from running.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod discovery;
pub mod error;
pub mod harness;
pub mod report;
pub mod step;
pub mod test_file;

pub use config::{RunnerConfig, RunnerEnv};
pub use discovery::discover;
pub use error::{HarnessError, HarnessResult};
pub use harness::{HookKind, HookOutcome, SuiteHarness, TestResult};
pub use report::{CaseRecord, FileReport, HookRecord, ReportBuilder, RunReport, TestReport};
pub use step::{CommandStep, Step, StepContext};
pub use test_file::{CaseManifest, ManifestLoader, ModuleLoader, TestCase, TestManifest, TestModule};
