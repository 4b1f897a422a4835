//! Reduction of build and test results into a [`PipelineSummary`].

use crate::result::{BuildResult, PipelineSummary, Status, TestResult};

/// Builds the run summary.
///
/// Pure: the inputs are only read, so calling it twice with the same inputs
/// yields equal summaries. The total duration is the sum of stage durations,
/// which matches wall-clock span only because stages never overlap.
#[must_use]
pub fn aggregate(builds: &[BuildResult], tests: &[TestResult], dry_run: bool) -> PipelineSummary {
    let failures = tests.iter().filter(|t| !t.passed).count();
    let total_duration_seconds = builds.iter().map(|b| b.duration_seconds).sum::<f64>()
        + tests.iter().map(|t| t.duration_seconds).sum::<f64>();

    PipelineSummary {
        dry_run,
        overall_status: Status::from_passed(failures == 0),
        failures,
        total_duration_seconds,
        modules: builds.to_vec(),
        tests: tests.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn build(module: &str, seconds: f64) -> BuildResult {
        BuildResult {
            module: module.to_string(),
            digest: crate::digest(module),
            status: Status::Ok,
            duration_seconds: seconds,
        }
    }

    fn test_result(name: &str, passed: bool, seconds: f64) -> TestResult {
        TestResult {
            name: name.to_string(),
            module: "core".to_string(),
            actual_digest: "a".to_string(),
            expected_digest: Some(if passed { "a" } else { "b" }.to_string()),
            passed,
            duration_seconds: seconds,
        }
    }

    #[test]
    fn empty_inputs_are_ok() {
        let summary = aggregate(&[], &[], false);
        assert_eq!(summary.overall_status, Status::Ok);
        assert_eq!(summary.failures, 0);
        assert!(summary.total_duration_seconds.abs() < f64::EPSILON);
    }

    #[test]
    fn one_failure_fails_the_run() {
        let tests = [test_result("a", true, 0.0), test_result("b", false, 0.0)];
        let summary = aggregate(&[build("core", 0.0)], &tests, false);
        assert_eq!(summary.overall_status, Status::Fail);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.passed(), 1);
    }

    #[test]
    fn total_duration_sums_builds_and_tests() {
        let summary = aggregate(
            &[build("core", 0.5), build("utils", 0.25)],
            &[test_result("a", true, 0.125)],
            false,
        );
        assert!((summary.total_duration_seconds - 0.875).abs() < 1e-9);
    }

    #[test]
    fn artifacts_follow_build_order() {
        let summary = aggregate(&[build("b", 0.0), build("a", 0.0)], &[], false);
        let names: Vec<_> = summary.artifacts().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a"]);
    }

    proptest! {
        #[test]
        fn overall_ok_iff_every_test_passed(outcomes in prop::collection::vec(any::<bool>(), 0..16)) {
            let tests: Vec<_> = outcomes
                .iter()
                .enumerate()
                .map(|(i, passed)| test_result(&format!("t{i}"), *passed, 0.0))
                .collect();
            let summary = aggregate(&[], &tests, false);
            prop_assert_eq!(summary.is_ok(), outcomes.iter().all(|p| *p));
            prop_assert_eq!(summary.clone(), aggregate(&[], &tests, false));
        }
    }
}
