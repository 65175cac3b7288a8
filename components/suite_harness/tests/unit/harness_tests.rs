//! Unit tests for the harness surface

use std::path::Path;
use suite_harness::{HookKind, HookOutcome, RunnerConfig, SuiteHarness, TestResult};
use suite_profile::{default_profile, resolve, ProfileName};

#[test]
fn test_harness_creation() {
    let harness = SuiteHarness::new(default_profile(), "/project");
    assert_eq!(harness.profile().name(), ProfileName::Unit);
    assert_eq!(harness.root(), Path::new("/project"));
}

#[test]
fn test_harness_from_config_uses_selected_profile() {
    let config = RunnerConfig {
        profile: Some("integration".to_string()),
        ..RunnerConfig::default()
    };
    let harness = SuiteHarness::from_config(&config).unwrap();
    assert_eq!(harness.profile(), &resolve("integration").unwrap());
}

#[test]
fn test_harness_from_config_rejects_unknown_profile() {
    let config = RunnerConfig {
        profile: Some("smoke".to_string()),
        ..RunnerConfig::default()
    };
    assert!(SuiteHarness::from_config(&config).is_err());
}

#[test]
fn test_result_is_pass() {
    assert!(TestResult::Pass.is_pass());
    assert!(!TestResult::Fail("error".to_string()).is_pass());
    assert!(!TestResult::Skip("reason".to_string()).is_pass());
    assert!(!TestResult::Timeout.is_pass());
}

#[test]
fn test_result_is_fail() {
    assert!(!TestResult::Pass.is_fail());
    assert!(TestResult::Fail("error".to_string()).is_fail());
    assert!(!TestResult::Skip("reason".to_string()).is_fail());
    assert!(!TestResult::Timeout.is_fail());
}

#[test]
fn test_result_is_skip() {
    assert!(!TestResult::Pass.is_skip());
    assert!(!TestResult::Fail("error".to_string()).is_skip());
    assert!(TestResult::Skip("reason".to_string()).is_skip());
    assert!(!TestResult::Timeout.is_skip());
}

#[test]
fn test_result_is_timeout() {
    assert!(!TestResult::Pass.is_timeout());
    assert!(!TestResult::Fail("error".to_string()).is_timeout());
    assert!(!TestResult::Skip("reason".to_string()).is_timeout());
    assert!(TestResult::Timeout.is_timeout());
}

#[test]
fn test_result_serializes_with_status_tag() {
    let json = serde_json::to_value(TestResult::Fail("boom".to_string())).unwrap();
    assert_eq!(json["status"], "fail");
    assert_eq!(json["reason"], "boom");

    let json = serde_json::to_value(TestResult::Timeout).unwrap();
    assert_eq!(json["status"], "timeout");
}

#[test]
fn test_hook_outcome_failure_reason() {
    assert_eq!(HookOutcome::Passed.failure_reason(), None);
    assert_eq!(
        HookOutcome::Failed("db down".to_string()).failure_reason(),
        Some("db down".to_string())
    );
    assert_eq!(
        HookOutcome::Timeout.failure_reason(),
        Some("hook timed out".to_string())
    );
}

#[test]
fn test_hook_kind_names() {
    assert_eq!(HookKind::BeforeAll.to_string(), "before_all");
    assert_eq!(HookKind::BeforeEach.to_string(), "before_each");
    assert_eq!(HookKind::AfterEach.to_string(), "after_each");
    assert_eq!(HookKind::AfterAll.to_string(), "after_all");
}
