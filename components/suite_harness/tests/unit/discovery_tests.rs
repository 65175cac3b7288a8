//! Unit tests for test file discovery

use std::fs;
use std::path::{Path, PathBuf};
use suite_harness::{discover, HarnessError};
use suite_profile::resolve;
use tempfile::TempDir;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "/*---\n---*/\n").unwrap();
}

fn tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "tests/unit/foo.test.ts");
    touch(dir.path(), "tests/unit/nested/deeper/bar.test.rs");
    touch(dir.path(), "tests/unit/helper.ts");
    touch(dir.path(), "tests/unit/fixtures/data.json");
    touch(dir.path(), "tests/integration/rpc.test.ts");
    touch(dir.path(), "tests/integration/support/client.ts");
    touch(dir.path(), "src/lib.test.ts");
    dir
}

#[test]
fn test_discover_unit_files() {
    let dir = tree();
    let unit = resolve("unit").unwrap();
    let files = discover(dir.path(), unit.include_pattern()).unwrap();

    assert_eq!(
        files,
        vec![
            PathBuf::from("tests/unit/foo.test.ts"),
            PathBuf::from("tests/unit/nested/deeper/bar.test.rs"),
        ]
    );
}

#[test]
fn test_discover_integration_files() {
    let dir = tree();
    let integration = resolve("integration").unwrap();
    let files = discover(dir.path(), integration.include_pattern()).unwrap();

    assert_eq!(files, vec![PathBuf::from("tests/integration/rpc.test.ts")]);
}

#[test]
fn test_discovered_sets_are_disjoint() {
    let dir = tree();
    let unit = discover(dir.path(), resolve("unit").unwrap().include_pattern()).unwrap();
    let integration =
        discover(dir.path(), resolve("integration").unwrap().include_pattern()).unwrap();

    assert!(unit.iter().all(|f| !integration.contains(f)));
}

#[test]
fn test_new_file_is_picked_up_without_config_change() {
    let dir = tree();
    let unit = resolve("unit").unwrap();
    let before = discover(dir.path(), unit.include_pattern()).unwrap();

    touch(dir.path(), "tests/unit/brand/new.test.js");
    let after = discover(dir.path(), unit.include_pattern()).unwrap();

    assert_eq!(after.len(), before.len() + 1);
    assert!(after.contains(&PathBuf::from("tests/unit/brand/new.test.js")));
}

#[test]
fn test_missing_test_root_selects_nothing() {
    let dir = TempDir::new().unwrap();
    let files = discover(dir.path(), resolve("integration").unwrap().include_pattern()).unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_directories_named_like_tests_are_ignored() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("tests/unit/odd.test.d")).unwrap();
    let files = discover(dir.path(), resolve("unit").unwrap().include_pattern()).unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_missing_project_root_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    let err = discover(&missing, resolve("unit").unwrap().include_pattern()).unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)));
}
