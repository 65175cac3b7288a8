//! Profile registry
//!
//! Holds the two built-in profiles and resolves them by name. Resolution is
//! a pure lookup with no side effects.

use crate::error::ProfileResult;
use crate::pattern::IncludePattern;
use crate::profile::{Environment, ProfileName, SuiteProfile};
use std::sync::LazyLock;

/// Glob for unit test files
pub const UNIT_INCLUDE: &str = "tests/unit/**/*.test.*";
/// Glob for integration test files
pub const INTEGRATION_INCLUDE: &str = "tests/integration/**/*.test.*";
/// Hook and test ceiling for the unit profile
pub const UNIT_TIMEOUT_MS: u64 = 60_000;
/// Hook and test ceiling for the integration profile
pub const INTEGRATION_TIMEOUT_MS: u64 = 120_000;

static BUILTIN: LazyLock<ProfileRegistry> = LazyLock::new(ProfileRegistry::new);

/// Registry of the built-in profiles
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    unit: SuiteProfile,
    integration: SuiteProfile,
}

impl ProfileRegistry {
    /// Build the registry with the unit and integration profiles
    pub fn new() -> Self {
        Self {
            unit: SuiteProfile::new(
                ProfileName::Unit,
                builtin_pattern(UNIT_INCLUDE),
                Environment::ServerSide,
                UNIT_TIMEOUT_MS,
                UNIT_TIMEOUT_MS,
            ),
            integration: SuiteProfile::new(
                ProfileName::Integration,
                builtin_pattern(INTEGRATION_INCLUDE),
                Environment::ServerSide,
                INTEGRATION_TIMEOUT_MS,
                INTEGRATION_TIMEOUT_MS,
            ),
        }
    }

    /// Look up a profile by name
    ///
    /// Fails with [`ProfileError::NotFound`](crate::ProfileError::NotFound)
    /// for anything other than `unit` or `integration`.
    pub fn resolve(&self, name: &str) -> ProfileResult<SuiteProfile> {
        let name: ProfileName = name.parse()?;
        Ok(self.get(name).clone())
    }

    /// Borrow a profile by its typed name
    pub fn get(&self, name: ProfileName) -> &SuiteProfile {
        match name {
            ProfileName::Unit => &self.unit,
            ProfileName::Integration => &self.integration,
        }
    }

    /// The profile used when none is selected
    pub fn default_profile(&self) -> &SuiteProfile {
        &self.unit
    }

    /// All profiles, default first
    pub fn profiles(&self) -> [&SuiteProfile; 2] {
        [&self.unit, &self.integration]
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Built-in globs are constants; a failure here is a programming error.
fn builtin_pattern(glob: &str) -> IncludePattern {
    IncludePattern::new(glob).expect("built-in include pattern must compile")
}

/// Resolve a built-in profile by name
pub fn resolve(name: &str) -> ProfileResult<SuiteProfile> {
    BUILTIN.resolve(name)
}

/// The unit profile
pub fn default_profile() -> SuiteProfile {
    BUILTIN.default_profile().clone()
}

/// Both built-in profiles, default first
pub fn profiles() -> [&'static SuiteProfile; 2] {
    BUILTIN.profiles()
}
