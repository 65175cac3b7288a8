use crate::error::{HarnessError, HarnessResult};
use crate::step::{CommandStep, Step};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use suite_profile::SuiteProfile;

/// One test case declared in a manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CaseManifest {
    /// Name shown in reports
    pub name: String,
    /// Shell command forming the test body
    pub run: String,
    /// Report the case as skipped without running it
    #[serde(default)]
    pub skip: bool,
}

/// Test manifest parsed from the YAML block of a test file
///
/// The block sits between `/*---` and `---*/`, anywhere in the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TestManifest {
    /// What the file covers
    pub description: Option<String>,
    /// Commands run once before any test
    pub before_all: Vec<String>,
    /// Commands run before every test
    pub before_each: Vec<String>,
    /// Commands run after every test
    pub after_each: Vec<String>,
    /// Commands run once after all tests
    pub after_all: Vec<String>,
    /// Test cases, in execution order
    pub tests: Vec<CaseManifest>,
}

impl TestManifest {
    /// Parse the manifest block out of a test file's source
    pub fn parse(source: &str) -> Result<Self, String> {
        let re = Regex::new(r"(?s)/\*---\r?\n(.*?)\r?\n?---\*/")
            .map_err(|e| format!("Failed to compile regex: {}", e))?;

        let yaml = re
            .captures(source)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or("No manifest block found in test file")?;

        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse manifest: {}", e))
    }

    /// Turn the manifest into runnable steps
    pub fn into_module(self, path: &Path, shell: &str) -> TestModule {
        let commands = |list: Vec<String>| -> Vec<Arc<dyn Step>> {
            list.into_iter()
                .map(|cmd| Arc::new(CommandStep::with_shell(shell, cmd)) as Arc<dyn Step>)
                .collect()
        };

        TestModule {
            path: path.to_path_buf(),
            description: self.description,
            before_all: commands(self.before_all),
            before_each: commands(self.before_each),
            after_each: commands(self.after_each),
            after_all: commands(self.after_all),
            cases: self
                .tests
                .into_iter()
                .map(|case| TestCase {
                    name: case.name,
                    body: Arc::new(CommandStep::with_shell(shell, case.run)),
                    skip: case.skip,
                })
                .collect(),
        }
    }
}

/// A test case ready to run
#[derive(Clone)]
pub struct TestCase {
    /// Name shown in reports
    pub name: String,
    /// The test body
    pub body: Arc<dyn Step>,
    /// Report as skipped without running
    pub skip: bool,
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("skip", &self.skip)
            .finish_non_exhaustive()
    }
}

/// A loaded test file: its hooks and cases
#[derive(Clone, Default)]
pub struct TestModule {
    /// Path relative to the project root
    pub path: PathBuf,
    /// What the file covers
    pub description: Option<String>,
    /// Run once before any test
    pub before_all: Vec<Arc<dyn Step>>,
    /// Run before every test
    pub before_each: Vec<Arc<dyn Step>>,
    /// Run after every test
    pub after_each: Vec<Arc<dyn Step>>,
    /// Run once after all tests
    pub after_all: Vec<Arc<dyn Step>>,
    /// Test cases, in execution order
    pub cases: Vec<TestCase>,
}

impl TestModule {
    /// Empty module for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Add a `before_all` hook
    pub fn before_all(mut self, step: impl Step + 'static) -> Self {
        self.before_all.push(Arc::new(step));
        self
    }

    /// Add a `before_each` hook
    pub fn before_each(mut self, step: impl Step + 'static) -> Self {
        self.before_each.push(Arc::new(step));
        self
    }

    /// Add an `after_each` hook
    pub fn after_each(mut self, step: impl Step + 'static) -> Self {
        self.after_each.push(Arc::new(step));
        self
    }

    /// Add an `after_all` hook
    pub fn after_all(mut self, step: impl Step + 'static) -> Self {
        self.after_all.push(Arc::new(step));
        self
    }

    /// Add a test case
    pub fn test(mut self, name: impl Into<String>, body: impl Step + 'static) -> Self {
        self.cases.push(TestCase {
            name: name.into(),
            body: Arc::new(body),
            skip: false,
        });
        self
    }

    /// Add a test case that is reported as skipped
    pub fn skip(mut self, name: impl Into<String>, body: impl Step + 'static) -> Self {
        self.cases.push(TestCase {
            name: name.into(),
            body: Arc::new(body),
            skip: true,
        });
        self
    }

    /// File name without directories
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }
}

impl fmt::Debug for TestModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestModule")
            .field("path", &self.path)
            .field("description", &self.description)
            .field("before_all", &self.before_all.len())
            .field("before_each", &self.before_each.len())
            .field("after_each", &self.after_each.len())
            .field("after_all", &self.after_all.len())
            .field("cases", &self.cases)
            .finish()
    }
}

/// Turns a discovered file into a runnable module
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Load `relative` (a path under `root`) for `profile`
    async fn load(
        &self,
        root: &Path,
        relative: &Path,
        profile: &SuiteProfile,
    ) -> HarnessResult<TestModule>;
}

/// Loads test files that carry a YAML manifest block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLoader {
    shell: String,
}

impl ManifestLoader {
    /// Loader running commands through `sh`
    pub fn new() -> Self {
        Self::with_shell("sh")
    }

    /// Loader running commands through another shell
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ManifestLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModuleLoader for ManifestLoader {
    async fn load(
        &self,
        root: &Path,
        relative: &Path,
        _profile: &SuiteProfile,
    ) -> HarnessResult<TestModule> {
        let source = tokio::fs::read_to_string(root.join(relative))
            .await
            .map_err(|source| HarnessError::Io {
                path: relative.to_path_buf(),
                source,
            })?;

        let manifest = TestManifest::parse(&source).map_err(|reason| HarnessError::Manifest {
            path: relative.to_path_buf(),
            reason,
        })?;

        Ok(manifest.into_module(relative, &self.shell))
    }
}
