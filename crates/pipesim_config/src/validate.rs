//! Semantic validation of a typed pipeline.
//!
//! Runs on every entry into the engine, so programmatically built
//! pipelines get the same checks as YAML ones.

use crate::error::{Error, Result};
use crate::model::{Module, TestCase};
use std::collections::{BTreeSet, HashSet};

/// Validates modules and tests.
///
/// Checks, in order: module names non-empty and unique, module durations
/// finite and non-negative, test names non-empty and unique, every test
/// references a declared module, test durations finite and non-negative.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate(modules: &[Module], tests: &[TestCase]) -> Result<()> {
    if modules.iter().any(|m| m.name.trim().is_empty()) {
        return Err(Error::EmptyModuleName);
    }
    let dupes = duplicates(modules.iter().map(|m| m.name.as_str()));
    if !dupes.is_empty() {
        return Err(Error::DuplicateModuleNames(dupes));
    }
    for module in modules {
        if !is_valid_seconds(module.simulated_seconds) {
            return Err(Error::InvalidModuleSeconds {
                module: module.name.clone(),
                seconds: module.simulated_seconds,
            });
        }
    }

    if tests.iter().any(|t| t.name.trim().is_empty()) {
        return Err(Error::EmptyTestName);
    }
    let dupes = duplicates(tests.iter().map(|t| t.name.as_str()));
    if !dupes.is_empty() {
        return Err(Error::DuplicateTestNames(dupes));
    }

    let module_names: HashSet<&str> = modules.iter().map(|m| m.name.as_str()).collect();
    for test in tests {
        if !module_names.contains(test.module_ref.as_str()) {
            return Err(Error::UnknownModuleRef {
                test: test.name.clone(),
                module: test.module_ref.clone(),
            });
        }
        if !is_valid_seconds(test.simulated_seconds) {
            return Err(Error::InvalidTestSeconds {
                test: test.name.clone(),
                seconds: test.simulated_seconds,
            });
        }
    }

    Ok(())
}

fn is_valid_seconds(seconds: f64) -> bool {
    seconds.is_finite() && seconds >= 0.0
}

/// Returns the sorted set of names that occur more than once.
fn duplicates<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dupes = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            dupes.insert(name.to_string());
        }
    }
    dupes.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn core() -> Module {
        Module::new("core", "src@abc123", 0.0)
    }

    #[test]
    fn accepts_valid_pipeline() {
        let tests = vec![TestCase::new("unit-core", "core", 0.0)];
        assert!(validate(&[core()], &tests).is_ok());
    }

    #[test]
    fn accepts_empty_pipeline() {
        assert!(validate(&[], &[]).is_ok());
    }

    #[test]
    fn duplicate_module_names_are_sorted() {
        let modules = vec![
            Module::new("b", "1", 0.0),
            Module::new("a", "2", 0.0),
            Module::new("b", "3", 0.0),
            Module::new("a", "4", 0.0),
        ];
        let err = validate(&modules, &[]).unwrap_err();
        assert!(matches!(err, Error::DuplicateModuleNames(ref names) if names == &["a", "b"]));
    }

    #[test]
    fn duplicate_test_names_rejected() {
        let tests = vec![TestCase::new("t", "core", 0.0), TestCase::new("t", "core", 0.0)];
        let err = validate(&[core()], &tests).unwrap_err();
        assert!(matches!(err, Error::DuplicateTestNames(_)));
    }

    #[test]
    fn negative_module_seconds_rejected() {
        let err = validate(&[Module::new("core", "x", -1.0)], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidModuleSeconds { .. }));
    }

    #[test]
    fn nan_test_seconds_rejected() {
        let tests = vec![TestCase::new("t", "core", f64::NAN)];
        let err = validate(&[core()], &tests).unwrap_err();
        assert!(matches!(err, Error::InvalidTestSeconds { .. }));
    }

    #[test]
    fn error_message_names_the_dangling_module() {
        let tests = vec![TestCase::new("unit-ghost", "ghost", 0.0)];
        let err = validate(&[core()], &tests).unwrap_err();
        assert_eq!(
            err.to_string(),
            "test 'unit-ghost' references unknown module 'ghost'"
        );
    }

    proptest! {
        #[test]
        fn unique_names_always_validate(names in prop::collection::hash_set("[a-z]{1,8}", 0..10)) {
            let modules: Vec<_> = names.iter().map(|n| Module::new(n.as_str(), "p", 0.0)).collect();
            prop_assert!(validate(&modules, &[]).is_ok());
        }
    }
}
