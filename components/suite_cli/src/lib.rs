//! Suite Runner CLI Library
//!
//! Argument parsing, configuration assembly and report rendering for the
//! `suite-runner` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod runner;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use runner::{build_config, execute, Execution};
