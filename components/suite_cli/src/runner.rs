//! Configuration assembly and run execution

use crate::cli::Cli;
use crate::error::CliResult;
use suite_harness::{RunnerConfig, SuiteHarness};
use tracing::debug;

/// What the binary should print and how it should exit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Text for stdout
    pub output: String,
    /// 0 on success, 1 when any test, hook or file failed
    pub exit_code: u8,
}

/// Merge the config file, environment and flags into one validated config
///
/// Precedence is flags, then environment, then config file. The profile is
/// resolved here, so an unknown name fails before any file is touched.
pub fn build_config<F>(cli: &Cli, env: F) -> CliResult<RunnerConfig>
where
    F: Fn(&str) -> Result<Option<String>, String>,
{
    let mut config = match &cli.config {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::default(),
    };

    config.apply_env_with(env)?;

    if let Some(profile) = &cli.profile {
        config.profile = Some(profile.clone());
    }
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if let Some(max) = cli.max_concurrency {
        config.max_concurrency = Some(max);
    }
    if cli.bail {
        config.bail = true;
    }

    config.validate()?;
    debug!(
        root = %config.root.display(),
        profile = ?config.profile,
        max_concurrency = ?config.max_concurrency,
        bail = config.bail,
        "resolved configuration"
    );
    Ok(config)
}

/// List or run the selected profile
pub async fn execute(cli: &Cli, config: &RunnerConfig) -> CliResult<Execution> {
    let harness = SuiteHarness::from_config(config)?;

    if cli.list {
        let mut paths: Vec<String> = harness
            .discover()?
            .iter()
            .map(|f| f.display().to_string())
            .collect();
        let output = if cli.json {
            serde_json::to_string_pretty(&paths)?
        } else {
            let count = paths.len();
            paths.push(format!(
                "{} file(s) selected by {} profile ({})",
                count,
                harness.profile().name(),
                harness.profile().include_pattern()
            ));
            paths.join("\n")
        };
        return Ok(Execution {
            output,
            exit_code: 0,
        });
    }

    let report = harness.run().await?;
    let output = if cli.json {
        report.to_json()?
    } else {
        report.summary()
    };

    Ok(Execution {
        output,
        exit_code: if report.is_success() { 0 } else { 1 },
    })
}
