//! Unit tests for the profile registry

use std::path::PathBuf;
use suite_profile::{
    default_profile, profiles, resolve, Environment, ProfileError, ProfileName, ProfileRegistry,
};

#[test]
fn test_resolve_unit() {
    let profile = resolve("unit").unwrap();
    assert_eq!(profile.name(), ProfileName::Unit);
    assert_eq!(profile.include_pattern().as_str(), "tests/unit/**/*.test.*");
    assert_eq!(profile.environment(), Environment::ServerSide);
    assert_eq!(profile.hook_timeout_ms(), 60_000);
    assert_eq!(profile.test_timeout_ms(), 60_000);
}

#[test]
fn test_resolve_integration() {
    let profile = resolve("integration").unwrap();
    assert_eq!(profile.name(), ProfileName::Integration);
    assert_eq!(
        profile.include_pattern().as_str(),
        "tests/integration/**/*.test.*"
    );
    assert_eq!(profile.environment(), Environment::ServerSide);
    assert_eq!(profile.hook_timeout_ms(), 120_000);
    assert_eq!(profile.test_timeout_ms(), 120_000);
}

#[test]
fn test_resolve_unknown_profile() {
    for name in ["", "e2e", "UNIT", "unit,integration", "tests/unit"] {
        let err = resolve(name).unwrap_err();
        assert_eq!(err, ProfileError::NotFound(name.to_string()));
        assert!(err.to_string().contains("profile not found"));
    }
}

#[test]
fn test_resolve_is_exact_about_whitespace() {
    for name in [" unit", "unit ", "\tintegration\n", " "] {
        let err = resolve(name).unwrap_err();
        assert_eq!(err, ProfileError::NotFound(name.to_string()));
    }
}

#[test]
fn test_default_profile_is_unit() {
    assert_eq!(default_profile(), resolve("unit").unwrap());
}

#[test]
fn test_integration_timeouts_not_below_unit() {
    let unit = resolve("unit").unwrap();
    let integration = resolve("integration").unwrap();
    assert!(integration.hook_timeout_ms() >= unit.hook_timeout_ms());
    assert!(integration.test_timeout_ms() >= unit.test_timeout_ms());
}

#[test]
fn test_exactly_two_profiles_default_first() {
    let all = profiles();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name(), ProfileName::Unit);
    assert_eq!(all[1].name(), ProfileName::Integration);
}

#[test]
fn test_test_roots_are_profile_directories() {
    assert_eq!(resolve("unit").unwrap().test_root(), PathBuf::from("tests/unit"));
    assert_eq!(
        resolve("integration").unwrap().test_root(),
        PathBuf::from("tests/integration")
    );
}

#[test]
fn test_registry_instance_matches_free_functions() {
    let registry = ProfileRegistry::default();
    assert_eq!(registry.default_profile(), &default_profile());
    assert_eq!(
        registry.get(ProfileName::Integration),
        &resolve("integration").unwrap()
    );
}
