//! Suite profile definitions

use crate::error::ProfileError;
use crate::pattern::IncludePattern;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Name of a suite profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileName {
    /// Fast, deterministic, in-process tests
    Unit,
    /// Slower tests that cross a process or network boundary
    Integration,
}

impl ProfileName {
    /// Every profile name, default first
    pub const ALL: [ProfileName; 2] = [ProfileName::Unit, ProfileName::Integration];

    /// Canonical lowercase name
    pub const fn as_str(self) -> &'static str {
        match self {
            ProfileName::Unit => "unit",
            ProfileName::Integration => "integration",
        }
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileName {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unit" => Ok(ProfileName::Unit),
            "integration" => Ok(ProfileName::Integration),
            _ => Err(ProfileError::NotFound(s.to_string())),
        }
    }
}

/// Execution environment for test files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    /// Plain server-side process, no simulated browser
    #[serde(rename = "server-side", alias = "node")]
    ServerSide,
}

impl Environment {
    /// Canonical tag
    pub const fn as_str(self) -> &'static str {
        match self {
            Environment::ServerSide => "server-side",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server-side" | "node" => Ok(Environment::ServerSide),
            other => Err(ProfileError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Resolved settings for one profile
///
/// Profiles are immutable once built; the fields are only reachable through
/// accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteProfile {
    name: ProfileName,
    include_pattern: IncludePattern,
    environment: Environment,
    hook_timeout_ms: u64,
    test_timeout_ms: u64,
}

impl SuiteProfile {
    pub(crate) fn new(
        name: ProfileName,
        include_pattern: IncludePattern,
        environment: Environment,
        hook_timeout_ms: u64,
        test_timeout_ms: u64,
    ) -> Self {
        Self {
            name,
            include_pattern,
            environment,
            hook_timeout_ms,
            test_timeout_ms,
        }
    }

    /// Profile name
    pub fn name(&self) -> ProfileName {
        self.name
    }

    /// Glob selecting this profile's test files
    pub fn include_pattern(&self) -> &IncludePattern {
        &self.include_pattern
    }

    /// Execution environment tag
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Ceiling for each setup/teardown hook, in milliseconds
    pub fn hook_timeout_ms(&self) -> u64 {
        self.hook_timeout_ms
    }

    /// Ceiling for each test body, in milliseconds
    pub fn test_timeout_ms(&self) -> u64 {
        self.test_timeout_ms
    }

    /// Ceiling for each setup/teardown hook
    pub fn hook_timeout(&self) -> Duration {
        Duration::from_millis(self.hook_timeout_ms)
    }

    /// Ceiling for each test body
    pub fn test_timeout(&self) -> Duration {
        Duration::from_millis(self.test_timeout_ms)
    }

    /// Project-relative directory the include pattern is rooted at
    pub fn test_root(&self) -> PathBuf {
        self.include_pattern.base_dir()
    }
}
