use crate::config::RunnerConfig;
use crate::discovery::discover;
use crate::error::HarnessResult;
use crate::report::{CaseRecord, FileReport, HookRecord, RunReport};
use crate::step::{Step, StepContext};
use crate::test_file::{ManifestLoader, ModuleLoader, TestModule};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use suite_profile::SuiteProfile;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Result of running a single test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum TestResult {
    /// Test passed successfully
    Pass,
    /// Test failed with reason
    Fail(String),
    /// Test was skipped with reason
    Skip(String),
    /// Test body exceeded the test timeout
    Timeout,
}

impl TestResult {
    /// Check if the result is a pass
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass)
    }

    /// Check if the result is a failure
    pub fn is_fail(&self) -> bool {
        matches!(self, TestResult::Fail(_))
    }

    /// Check if the result is a skip
    pub fn is_skip(&self) -> bool {
        matches!(self, TestResult::Skip(_))
    }

    /// Check if the result is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, TestResult::Timeout)
    }
}

/// Which hook list a hook belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    /// Once before any test in the file
    BeforeAll,
    /// Before every test
    BeforeEach,
    /// After every test
    AfterEach,
    /// Once after all tests in the file
    AfterAll,
}

impl HookKind {
    /// Snake-case name
    pub const fn as_str(self) -> &'static str {
        match self {
            HookKind::BeforeAll => "before_all",
            HookKind::BeforeEach => "before_each",
            HookKind::AfterEach => "after_each",
            HookKind::AfterAll => "after_all",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a hook (or any single step) ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum HookOutcome {
    /// Completed without error
    Passed,
    /// Returned an error or panicked
    Failed(String),
    /// Exceeded the hook timeout and was cancelled
    Timeout,
}

impl HookOutcome {
    /// Check if the hook passed
    pub fn is_passed(&self) -> bool {
        matches!(self, HookOutcome::Passed)
    }

    /// Reason for a non-passing outcome
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            HookOutcome::Passed => None,
            HookOutcome::Failed(reason) => Some(reason.clone()),
            HookOutcome::Timeout => Some("hook timed out".to_string()),
        }
    }
}

/// Runs the files selected by one profile
pub struct SuiteHarness {
    profile: SuiteProfile,
    root: PathBuf,
    loader: Arc<dyn ModuleLoader>,
    max_concurrency: usize,
    bail: bool,
}

impl SuiteHarness {
    /// Harness for `profile` rooted at `root`, loading manifest test files
    pub fn new(profile: SuiteProfile, root: impl Into<PathBuf>) -> Self {
        Self {
            profile,
            root: root.into(),
            loader: Arc::new(ManifestLoader::new()),
            max_concurrency: default_concurrency(),
            bail: false,
        }
    }

    /// Harness configured from a validated [`RunnerConfig`]
    pub fn from_config(config: &RunnerConfig) -> HarnessResult<Self> {
        let profile = config.resolve_profile()?;
        Ok(Self::new(profile, config.root.clone())
            .with_loader(ManifestLoader::with_shell(config.shell.clone()))
            .with_max_concurrency(config.effective_concurrency())
            .with_bail(config.bail))
    }

    /// Replace the module loader
    pub fn with_loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    /// Cap the number of files run at once; 1 runs files sequentially
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    /// Stop starting new files once one file has failed
    pub fn with_bail(mut self, bail: bool) -> Self {
        self.bail = bail;
        self
    }

    /// The active profile
    pub fn profile(&self) -> &SuiteProfile {
        &self.profile
    }

    /// The project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files the profile selects, relative to the root, sorted
    pub fn discover(&self) -> HarnessResult<Vec<PathBuf>> {
        discover(&self.root, self.profile.include_pattern())
    }

    /// Discover and run every selected file
    ///
    /// An empty selection yields an empty, successful report.
    pub async fn run(&self) -> HarnessResult<RunReport> {
        let started = Instant::now();
        let files = self.discover()?;

        info!(
            profile = %self.profile.name(),
            files = files.len(),
            "starting suite run"
        );

        let mut pending = files.into_iter();
        let mut joins = JoinSet::new();
        let mut in_flight: HashMap<tokio::task::Id, PathBuf> = HashMap::new();
        let mut reports = Vec::new();
        let mut stopped = false;

        loop {
            while !stopped && joins.len() < self.max_concurrency {
                let Some(path) = pending.next() else { break };
                let handle = joins.spawn(run_file(
                    Arc::clone(&self.loader),
                    self.profile.clone(),
                    self.root.clone(),
                    path.clone(),
                ));
                in_flight.insert(handle.id(), path);
            }

            let Some(joined) = joins.join_next_with_id().await else {
                break;
            };

            let report = match joined {
                Ok((id, report)) => {
                    in_flight.remove(&id);
                    report
                }
                Err(err) => {
                    let path = in_flight.remove(&err.id()).unwrap_or_default();
                    FileReport::load_failed(path, join_failure(err))
                }
            };

            if self.bail && !stopped && !report.is_success() {
                warn!(file = %report.path.display(), "file failed, not starting remaining files");
                stopped = true;
            }
            reports.push(report);
        }

        let report = RunReport::new(self.profile.name(), reports, elapsed_ms(started));
        info!(
            profile = %report.profile,
            tests = report.totals.total,
            passed = report.totals.passed,
            failed = report.totals.failed + report.totals.timeout,
            "suite run finished"
        );
        Ok(report)
    }

    /// Run one already-loaded module under this harness's profile
    pub async fn run_module(&self, module: TestModule) -> FileReport {
        execute_module(module, &self.profile, &self.root).await
    }
}

fn default_concurrency() -> usize {
    RunnerConfig::default().effective_concurrency()
}

async fn run_file(
    loader: Arc<dyn ModuleLoader>,
    profile: SuiteProfile,
    root: PathBuf,
    path: PathBuf,
) -> FileReport {
    match loader.load(&root, &path, &profile).await {
        Ok(module) => execute_module(module, &profile, &root).await,
        Err(err) => {
            warn!(file = %path.display(), error = %err, "could not load test file");
            FileReport::load_failed(path, err.to_string())
        }
    }
}

/// Run hooks and cases of one file, in order
async fn execute_module(module: TestModule, profile: &SuiteProfile, root: &Path) -> FileReport {
    let started = Instant::now();
    let hook_limit = profile.hook_timeout();
    let test_limit = profile.test_timeout();
    let ctx = Arc::new(StepContext {
        root: root.to_path_buf(),
        file: module.path.clone(),
        profile: profile.name(),
        environment: profile.environment(),
    });
    let mut report = FileReport::new(module.path.clone());

    info!(file = %module.path.display(), cases = module.cases.len(), "running test file");

    let mut setup_failure = None;
    for (index, hook) in module.before_all.iter().enumerate() {
        let record = run_hook(hook, &ctx, hook_limit, HookKind::BeforeAll, index, None).await;
        let failure = record.outcome.failure_reason();
        report.hooks.push(record);
        if let Some(reason) = failure {
            setup_failure = Some(reason);
            break;
        }
    }

    for case in &module.cases {
        if let Some(reason) = &setup_failure {
            report.cases.push(CaseRecord {
                name: case.name.clone(),
                result: TestResult::Skip(format!("setup failed: {}", reason)),
                duration_ms: 0,
            });
            continue;
        }
        if case.skip {
            report.cases.push(CaseRecord {
                name: case.name.clone(),
                result: TestResult::Skip("marked as skipped".to_string()),
                duration_ms: 0,
            });
            continue;
        }

        let mut result = None;
        for (index, hook) in module.before_each.iter().enumerate() {
            let record = run_hook(
                hook,
                &ctx,
                hook_limit,
                HookKind::BeforeEach,
                index,
                Some(case.name.as_str()),
            )
            .await;
            let failure = record.outcome.failure_reason();
            report.hooks.push(record);
            if let Some(reason) = failure {
                result = Some(TestResult::Fail(format!(
                    "before_each #{} failed: {}",
                    index, reason
                )));
                break;
            }
        }

        let body_started = Instant::now();
        let mut result = match result {
            Some(result) => result,
            None => {
                debug!(file = %ctx.file.display(), test = %case.name, "running test");
                match run_step(&case.body, &ctx, test_limit).await {
                    HookOutcome::Passed => TestResult::Pass,
                    HookOutcome::Failed(reason) => TestResult::Fail(reason),
                    HookOutcome::Timeout => {
                        warn!(
                            file = %ctx.file.display(),
                            test = %case.name,
                            limit_ms = profile.test_timeout_ms(),
                            "test timed out"
                        );
                        TestResult::Timeout
                    }
                }
            }
        };
        let duration_ms = elapsed_ms(body_started);

        for (index, hook) in module.after_each.iter().enumerate() {
            let record = run_hook(
                hook,
                &ctx,
                hook_limit,
                HookKind::AfterEach,
                index,
                Some(case.name.as_str()),
            )
            .await;
            if let (true, Some(reason)) = (result.is_pass(), record.outcome.failure_reason()) {
                result = TestResult::Fail(format!("after_each #{} failed: {}", index, reason));
            }
            report.hooks.push(record);
        }

        report.cases.push(CaseRecord {
            name: case.name.clone(),
            result,
            duration_ms,
        });
    }

    for (index, hook) in module.after_all.iter().enumerate() {
        let record = run_hook(hook, &ctx, hook_limit, HookKind::AfterAll, index, None).await;
        report.hooks.push(record);
    }

    report.duration_ms = elapsed_ms(started);
    report
}

async fn run_hook(
    hook: &Arc<dyn Step>,
    ctx: &Arc<StepContext>,
    limit: Duration,
    kind: HookKind,
    index: usize,
    test: Option<&str>,
) -> HookRecord {
    let started = Instant::now();
    debug!(file = %ctx.file.display(), hook = %kind, index, "running hook");
    let outcome = run_step(hook, ctx, limit).await;

    match &outcome {
        HookOutcome::Timeout => warn!(
            file = %ctx.file.display(),
            hook = %kind,
            index,
            limit_ms = duration_ms(limit),
            "hook timed out"
        ),
        HookOutcome::Failed(reason) => warn!(
            file = %ctx.file.display(),
            hook = %kind,
            index,
            reason = %reason,
            "hook failed"
        ),
        HookOutcome::Passed => {}
    }

    HookRecord {
        kind,
        index,
        test: test.map(str::to_string),
        outcome,
        duration_ms: elapsed_ms(started),
    }
}

/// Race one step against `limit`
///
/// The step runs on its own task so a panic is contained and a timeout can
/// abort it. On timeout the aborted task is awaited, so the step has been
/// dropped (and its processes killed) before `Timeout` is returned.
async fn run_step(step: &Arc<dyn Step>, ctx: &Arc<StepContext>, limit: Duration) -> HookOutcome {
    let step = Arc::clone(step);
    let step_ctx = Arc::clone(ctx);
    let mut handle = tokio::spawn(async move { step.run(&step_ctx).await });

    let finished = tokio::time::timeout(limit, &mut handle).await;
    match finished {
        Ok(Ok(Ok(()))) => HookOutcome::Passed,
        Ok(Ok(Err(reason))) => HookOutcome::Failed(reason),
        Ok(Err(err)) => HookOutcome::Failed(join_failure(err)),
        Err(_) => {
            handle.abort();
            if let Err(err) = handle.await {
                if err.is_panic() {
                    warn!(file = %ctx.file.display(), "step panicked while being cancelled");
                }
            }
            HookOutcome::Timeout
        }
    }
}

fn join_failure(err: JoinError) -> String {
    if err.is_cancelled() {
        return "cancelled".to_string();
    }
    match err.try_into_panic() {
        Ok(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            format!("panicked: {}", message)
        }
        Err(err) => err.to_string(),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    duration_ms(started.elapsed())
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
