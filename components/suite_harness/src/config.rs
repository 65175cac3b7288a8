//! Runner configuration
//!
//! Settings come from an optional YAML file, then environment overrides,
//! then whatever the caller (usually the CLI) sets last. Profiles themselves
//! are fixed; configuration only selects one.

use crate::error::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use suite_profile::{default_profile, resolve, SuiteProfile};

/// Environment keys read by [`RunnerConfig::apply_env`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerEnv {
    /// Profile name override
    Profile,
    /// Project root override
    Root,
}

impl RunnerEnv {
    /// Every key
    pub const ALL: [RunnerEnv; 2] = [RunnerEnv::Profile, RunnerEnv::Root];

    /// Environment variable name
    pub const fn as_str(self) -> &'static str {
        match self {
            RunnerEnv::Profile => "SUITE_RUNNER_PROFILE",
            RunnerEnv::Root => "SUITE_RUNNER_ROOT",
        }
    }
}

/// Settings for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Project root that include patterns are evaluated against
    pub root: PathBuf,
    /// Profile name; the default profile when unset
    pub profile: Option<String>,
    /// Maximum files run at once; available parallelism when unset
    pub max_concurrency: Option<usize>,
    /// Stop starting new files after the first failing file
    pub bail: bool,
    /// Shell used for manifest commands
    pub shell: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            profile: None,
            max_concurrency: None,
            bail: false,
            shell: "sh".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Load and validate a YAML config file
    ///
    /// A relative `root` is taken relative to the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> HarnessResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_yaml_str(&source)?;
        if config.root.is_relative() {
            if let Some(dir) = path.parent() {
                config.root = dir.join(&config.root);
            }
        }
        Ok(config)
    }

    /// Parse and validate YAML config text
    pub fn from_yaml_str(source: &str) -> HarnessResult<Self> {
        let config: Self = if source.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(source)
                .map_err(|e| HarnessError::Config(format!("invalid config file: {}", e)))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> HarnessResult<()> {
        self.apply_env_with(read_env_strict)
    }

    /// Apply overrides using `lookup` in place of the process environment
    pub fn apply_env_with<F>(&mut self, lookup: F) -> HarnessResult<()>
    where
        F: Fn(&str) -> Result<Option<String>, String>,
    {
        for key in RunnerEnv::ALL {
            let name = key.as_str();
            let Some(value) = lookup(name).map_err(HarnessError::Config)? else {
                continue;
            };
            if value.trim().is_empty() {
                return Err(HarnessError::Config(format!("{} must not be empty", name)));
            }
            match key {
                RunnerEnv::Profile => self.profile = Some(value),
                RunnerEnv::Root => self.root = PathBuf::from(value),
            }
        }
        Ok(())
    }

    /// Check value ranges and that the profile exists
    ///
    /// The profile is checked here so a bad name fails before any file is
    /// discovered.
    pub fn validate(&self) -> HarnessResult<()> {
        if self.max_concurrency == Some(0) {
            return Err(HarnessError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.shell.trim().is_empty() {
            return Err(HarnessError::Config("shell must not be empty".to_string()));
        }
        self.resolve_profile()?;
        Ok(())
    }

    /// The selected profile, or the default one
    pub fn resolve_profile(&self) -> HarnessResult<SuiteProfile> {
        match &self.profile {
            Some(name) => Ok(resolve(name)?),
            None => Ok(default_profile()),
        }
    }

    /// Files run at once
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// Read an environment variable, rejecting non-UTF-8 values
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| format!("{} must be valid UTF-8", name))
    })
}
