use crate::harness::{HookKind, HookOutcome, TestResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use suite_profile::ProfileName;

/// Aggregate counters with failure details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    /// Total number of tests reported
    pub total: usize,
    /// Number of tests that passed
    pub passed: usize,
    /// Number of tests that failed
    pub failed: usize,
    /// Number of tests that were skipped
    pub skipped: usize,
    /// Number of tests that timed out
    pub timeout: usize,
    /// Number of hooks that failed or timed out
    pub hook_failures: usize,
    /// Number of files that could not be loaded
    pub load_errors: usize,
    /// Failures with (location, reason)
    pub failures: Vec<(String, String)>,
    /// Skipped tests with (location, reason)
    pub skips: Vec<(String, String)>,
}

impl TestReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a test result to the report
    pub fn add_result(&mut self, location: &str, result: TestResult) {
        self.total += 1;
        match result {
            TestResult::Pass => self.passed += 1,
            TestResult::Fail(reason) => {
                self.failed += 1;
                self.failures.push((location.to_string(), reason));
            }
            TestResult::Skip(reason) => {
                self.skipped += 1;
                self.skips.push((location.to_string(), reason));
            }
            TestResult::Timeout => {
                self.timeout += 1;
                self.failures
                    .push((location.to_string(), "test timed out".to_string()));
            }
        }
    }

    /// Record a hook that failed or timed out; passing hooks are ignored
    pub fn add_hook(&mut self, location: &str, outcome: &HookOutcome) {
        if let Some(reason) = outcome.failure_reason() {
            self.hook_failures += 1;
            self.failures.push((location.to_string(), reason));
        }
    }

    /// Record a file that could not be loaded
    pub fn add_load_error(&mut self, location: &str, reason: &str) {
        self.load_errors += 1;
        self.failures
            .push((location.to_string(), reason.to_string()));
    }

    /// Calculate the pass rate as a percentage
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Calculate the effective pass rate (excluding skips)
    pub fn effective_pass_rate(&self) -> f64 {
        let executed = self.total - self.skipped;
        if executed == 0 {
            0.0
        } else {
            (self.passed as f64 / executed as f64) * 100.0
        }
    }

    /// Generate a human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Total: {}\n\
             Passed: {} ({:.1}%)\n\
             Failed: {}\n\
             Skipped: {}\n\
             Timeout: {}\n\
             Hook failures: {}\n\
             Load errors: {}",
            self.total,
            self.passed,
            self.pass_rate(),
            self.failed,
            self.skipped,
            self.timeout,
            self.hook_failures,
            self.load_errors,
        )
    }

    /// Generate a detailed report including failures
    pub fn detailed_summary(&self) -> String {
        let mut output = self.summary();

        if !self.failures.is_empty() {
            output.push_str("\n\nFailures:\n");
            for (location, reason) in &self.failures {
                output.push_str(&format!("  - {}\n    Reason: {}\n", location, reason));
            }
        }

        output
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: &TestReport) {
        self.total += other.total;
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.timeout += other.timeout;
        self.hook_failures += other.hook_failures;
        self.load_errors += other.load_errors;
        self.failures.extend(other.failures.iter().cloned());
        self.skips.extend(other.skips.iter().cloned());
    }

    /// True when nothing failed, timed out, or failed to load
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.timeout == 0 && self.hook_failures == 0 && self.load_errors == 0
    }

    /// Export report as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Import report from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Report builder for aggregating multiple reports
#[derive(Debug, Default)]
pub struct ReportBuilder {
    reports: Vec<TestReport>,
}

impl ReportBuilder {
    /// Create a new report builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a report to be aggregated
    pub fn add_report(&mut self, report: TestReport) -> &mut Self {
        self.reports.push(report);
        self
    }

    /// Build an aggregated report from all added reports
    pub fn build(&self) -> TestReport {
        let mut combined = TestReport::new();
        for report in &self.reports {
            combined.merge(report);
        }
        combined
    }

    /// Get number of reports added
    pub fn count(&self) -> usize {
        self.reports.len()
    }
}

/// One hook execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookRecord {
    /// Which hook list it came from
    pub kind: HookKind,
    /// Position within that list
    pub index: usize,
    /// Test the hook ran around, for per-test hooks
    pub test: Option<String>,
    /// How it ended
    pub outcome: HookOutcome,
    /// Wall-clock time spent
    pub duration_ms: u64,
}

impl HookRecord {
    /// Label used in failure listings, e.g. `before_all #0`
    pub fn label(&self) -> String {
        match &self.test {
            Some(test) => format!("{} #{} ({})", self.kind, self.index, test),
            None => format!("{} #{}", self.kind, self.index),
        }
    }
}

/// One test case execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Test name
    pub name: String,
    /// Result
    pub result: TestResult,
    /// Wall-clock time spent in the body
    pub duration_ms: u64,
}

/// Everything that happened in one test file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    /// Path relative to the project root
    pub path: PathBuf,
    /// Set when the file could not be loaded; nothing else ran
    pub load_error: Option<String>,
    /// Hook executions in order
    pub hooks: Vec<HookRecord>,
    /// Test executions in order
    pub cases: Vec<CaseRecord>,
    /// Wall-clock time for the whole file
    pub duration_ms: u64,
}

impl FileReport {
    /// Empty report for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            load_error: None,
            hooks: Vec::new(),
            cases: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Report for a file that never ran
    pub fn load_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        let mut report = Self::new(path);
        report.load_error = Some(reason.into());
        report
    }

    /// Outcome of the first `before_all` hook that did not pass
    pub fn setup_failure(&self) -> Option<&HookOutcome> {
        self.hooks
            .iter()
            .filter(|h| h.kind == HookKind::BeforeAll)
            .map(|h| &h.outcome)
            .find(|o| !o.is_passed())
    }

    /// True when a `before_all` hook hit its ceiling
    pub fn setup_timed_out(&self) -> bool {
        matches!(self.setup_failure(), Some(HookOutcome::Timeout))
    }

    /// Result of the named test, if it was reported
    pub fn case(&self, name: &str) -> Option<&TestResult> {
        self.cases.iter().find(|c| c.name == name).map(|c| &c.result)
    }

    /// Counters for this file alone
    pub fn summary(&self) -> TestReport {
        let path = self.path.display().to_string();
        let mut report = TestReport::new();

        if let Some(reason) = &self.load_error {
            report.add_load_error(&path, reason);
        }
        for hook in &self.hooks {
            report.add_hook(&format!("{} [{}]", path, hook.label()), &hook.outcome);
        }
        for case in &self.cases {
            report.add_result(&format!("{} > {}", path, case.name), case.result.clone());
        }

        report
    }

    /// True when this file had no failures of any kind
    pub fn is_success(&self) -> bool {
        self.summary().is_success()
    }
}

/// Result of running one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Profile that was run
    pub profile: ProfileName,
    /// Per-file reports, sorted by path
    pub files: Vec<FileReport>,
    /// Counters across every file
    pub totals: TestReport,
    /// Wall-clock time for the run
    pub duration_ms: u64,
}

impl RunReport {
    /// Build a run report; files are sorted by path
    pub fn new(profile: ProfileName, mut files: Vec<FileReport>, duration_ms: u64) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let mut builder = ReportBuilder::new();
        for file in &files {
            builder.add_report(file.summary());
        }

        Self {
            profile,
            totals: builder.build(),
            files,
            duration_ms,
        }
    }

    /// Report for the named file
    pub fn file(&self, path: impl AsRef<std::path::Path>) -> Option<&FileReport> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path == path)
    }

    /// Number of test cases reported across all files
    pub fn tests_run(&self) -> usize {
        self.totals.total
    }

    /// True when no file reported a failure
    pub fn is_success(&self) -> bool {
        self.totals.is_success()
    }

    /// Human-readable summary with failures
    pub fn summary(&self) -> String {
        format!(
            "Suite Results ({} profile)\nFiles: {}\n{}\nTime: {:.2}s",
            self.profile,
            self.files.len(),
            self.totals.detailed_summary().trim_end(),
            self.duration_ms as f64 / 1000.0
        )
    }

    /// Export as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
