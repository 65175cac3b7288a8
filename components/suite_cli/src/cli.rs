//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Run the test files selected by a suite profile
#[derive(Debug, Parser)]
#[command(name = "suite-runner")]
#[command(about = "Profile-driven test suite runner", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Profile to run: unit or integration (default: unit)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Project root the include pattern is evaluated against
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only list the files the profile selects
    #[arg(short, long)]
    pub list: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Maximum number of files run at once
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Stop starting new files after the first failing file
    #[arg(long)]
    pub bail: bool,

    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
