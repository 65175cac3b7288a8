//! Suite Runner
//!
//! Entry point. Parses arguments, installs logging, and runs the selected
//! profile.

use clap::Parser;
use std::process::ExitCode;
use suite_cli::{build_config, execute, Cli, CliResult, Execution};
use suite_harness::config::read_env_strict;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match cli.verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(&cli).await {
        Ok(execution) => {
            println!("{}", execution.output);
            ExitCode::from(execution.exit_code)
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> CliResult<Execution> {
    let config = build_config(cli, read_env_strict)?;
    execute(cli, &config).await
}
