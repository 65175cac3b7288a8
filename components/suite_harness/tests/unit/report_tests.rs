//! Unit tests for report generation

use std::path::PathBuf;
use suite_harness::{
    CaseRecord, FileReport, HookKind, HookOutcome, HookRecord, RunReport, TestReport, TestResult,
};
use suite_profile::ProfileName;

fn hook(kind: HookKind, outcome: HookOutcome) -> HookRecord {
    HookRecord {
        kind,
        index: 0,
        test: None,
        outcome,
        duration_ms: 1,
    }
}

fn case(name: &str, result: TestResult) -> CaseRecord {
    CaseRecord {
        name: name.to_string(),
        result,
        duration_ms: 1,
    }
}

#[test]
fn test_new_report() {
    let report = TestReport::new();
    assert_eq!(report.total, 0);
    assert_eq!(report.passed, 0);
    assert_eq!(report.failed, 0);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.timeout, 0);
    assert_eq!(report.hook_failures, 0);
    assert_eq!(report.load_errors, 0);
    assert!(report.failures.is_empty());
    assert!(report.skips.is_empty());
    assert!(report.is_success());
}

#[test]
fn test_add_results() {
    let mut report = TestReport::new();
    report.add_result("a", TestResult::Pass);
    report.add_result("b", TestResult::Fail("error".to_string()));
    report.add_result("c", TestResult::Skip("later".to_string()));
    report.add_result("d", TestResult::Timeout);

    assert_eq!(report.total, 4);
    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.timeout, 1);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0], ("b".to_string(), "error".to_string()));
    assert_eq!(report.skips, vec![("c".to_string(), "later".to_string())]);
    assert!(!report.is_success());
}

#[test]
fn test_passing_hook_is_not_counted() {
    let mut report = TestReport::new();
    report.add_hook("x [before_all #0]", &HookOutcome::Passed);
    assert_eq!(report.hook_failures, 0);
    assert!(report.is_success());

    report.add_hook("x [before_all #1]", &HookOutcome::Timeout);
    assert_eq!(report.hook_failures, 1);
    assert_eq!(report.total, 0);
    assert!(!report.is_success());
}

#[test]
fn test_load_error_makes_report_fail() {
    let mut report = TestReport::new();
    report.add_load_error("tests/unit/bad.test.ts", "invalid manifest");
    assert_eq!(report.load_errors, 1);
    assert!(!report.is_success());
}

#[test]
fn test_rates() {
    let mut report = TestReport::new();
    assert_eq!(report.pass_rate(), 0.0);
    assert_eq!(report.effective_pass_rate(), 0.0);

    report.add_result("a", TestResult::Pass);
    report.add_result("b", TestResult::Fail("x".to_string()));
    report.add_result("c", TestResult::Skip("y".to_string()));
    report.add_result("d", TestResult::Skip("z".to_string()));

    assert!((report.pass_rate() - 25.0).abs() < 0.01);
    assert!((report.effective_pass_rate() - 50.0).abs() < 0.01);
}

#[test]
fn test_detailed_summary_lists_failures() {
    let mut report = TestReport::new();
    report.add_result("tests/unit/a.test.ts > adds", TestResult::Fail("1 != 2".to_string()));
    let text = report.detailed_summary();
    assert!(text.contains("Total: 1"));
    assert!(text.contains("Failures:"));
    assert!(text.contains("tests/unit/a.test.ts > adds"));
    assert!(text.contains("1 != 2"));
}

#[test]
fn test_json_roundtrip() {
    let mut report = TestReport::new();
    report.add_result("a", TestResult::Pass);
    report.add_hook("b", &HookOutcome::Failed("down".to_string()));
    let restored = TestReport::from_json(&report.to_json().unwrap()).unwrap();
    assert_eq!(restored, report);
}

#[test]
fn test_file_report_summary_labels() {
    let mut file = FileReport::new("tests/unit/db.test.ts");
    file.hooks
        .push(hook(HookKind::BeforeAll, HookOutcome::Failed("no db".to_string())));
    file.cases.push(case(
        "reads",
        TestResult::Skip("setup failed: no db".to_string()),
    ));

    let summary = file.summary();
    assert_eq!(summary.hook_failures, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(
        summary.failures[0].0,
        "tests/unit/db.test.ts [before_all #0]"
    );
    assert_eq!(summary.skips[0].0, "tests/unit/db.test.ts > reads");
    assert!(!file.is_success());
}

#[test]
fn test_file_report_setup_queries() {
    let mut file = FileReport::new("tests/unit/foo.test.ts");
    assert!(file.setup_failure().is_none());
    assert!(!file.setup_timed_out());

    file.hooks.push(hook(HookKind::BeforeAll, HookOutcome::Passed));
    file.hooks.push(hook(HookKind::AfterEach, HookOutcome::Timeout));
    assert!(!file.setup_timed_out());

    file.hooks.push(hook(HookKind::BeforeAll, HookOutcome::Timeout));
    assert!(file.setup_timed_out());
}

#[test]
fn test_file_report_load_failed() {
    let file = FileReport::load_failed("tests/unit/x.test.ts", "unreadable");
    assert_eq!(file.load_error.as_deref(), Some("unreadable"));
    assert_eq!(file.summary().load_errors, 1);
    assert!(!file.is_success());
}

#[test]
fn test_file_report_case_lookup() {
    let mut file = FileReport::new("tests/unit/x.test.ts");
    file.cases.push(case("one", TestResult::Pass));
    assert_eq!(file.case("one"), Some(&TestResult::Pass));
    assert_eq!(file.case("two"), None);
}

#[test]
fn test_run_report_sorts_and_totals() {
    let mut b = FileReport::new("tests/unit/b.test.ts");
    b.cases.push(case("x", TestResult::Pass));
    let mut a = FileReport::new("tests/unit/a.test.ts");
    a.cases.push(case("y", TestResult::Timeout));

    let run = RunReport::new(ProfileName::Unit, vec![b, a], 1500);
    assert_eq!(run.files[0].path, PathBuf::from("tests/unit/a.test.ts"));
    assert_eq!(run.tests_run(), 2);
    assert_eq!(run.totals.passed, 1);
    assert_eq!(run.totals.timeout, 1);
    assert!(!run.is_success());
    assert!(run.file("tests/unit/b.test.ts").is_some());

    let text = run.summary();
    assert!(text.contains("unit profile"));
    assert!(text.contains("Files: 2"));
    assert!(text.contains("Time: 1.50s"));
}

#[test]
fn test_empty_run_report_is_success() {
    let run = RunReport::new(ProfileName::Integration, Vec::new(), 0);
    assert_eq!(run.tests_run(), 0);
    assert!(run.is_success());
    let json: serde_json::Value = serde_json::from_str(&run.to_json().unwrap()).unwrap();
    assert_eq!(json["profile"], "integration");
    assert_eq!(json["totals"]["total"], 0);
}
