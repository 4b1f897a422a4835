//! Build, test, and summary result types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a stage or of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// Succeeded.
    Ok,
    /// Failed.
    Fail,
}

impl Status {
    /// `Ok` when `passed`, otherwise `Fail`.
    #[must_use]
    pub const fn from_passed(passed: bool) -> Self {
        if passed {
            Self::Ok
        } else {
            Self::Fail
        }
    }

    /// Returns true for `Ok`.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// A built module artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildResult {
    /// Module name.
    pub module: String,
    /// Digest of the module payload.
    pub digest: String,
    /// Always `Ok`: simulated builds cannot fail.
    pub status: Status,
    /// Observed build duration in seconds.
    pub duration_seconds: f64,
}

/// Outcome of one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test name.
    pub name: String,
    /// Module under test.
    pub module: String,
    /// Digest the module actually produced.
    pub actual_digest: String,
    /// Digest the test expected, if any.
    pub expected_digest: Option<String>,
    /// Whether the test passed.
    pub passed: bool,
    /// Observed run duration in seconds.
    pub duration_seconds: f64,
}

/// Final report of a run. Built once, after every stage has been recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// `Fail` iff at least one test failed.
    pub overall_status: Status,
    /// Number of failed tests.
    pub failures: usize,
    /// Sum of all build and test durations.
    pub total_duration_seconds: f64,
    /// Built modules in build order.
    pub modules: Vec<BuildResult>,
    /// Test outcomes in run order.
    pub tests: Vec<TestResult>,
}

impl PipelineSummary {
    /// Returns true if every test passed.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.overall_status.is_ok()
    }

    /// Number of passed tests.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.tests.len() - self.failures
    }

    /// Iterates `(module, digest)` pairs in build order.
    pub fn artifacts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.modules
            .iter()
            .map(|b| (b.module.as_str(), b.digest.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_from_passed() {
        assert_eq!(Status::from_passed(true), Status::Ok);
        assert_eq!(Status::from_passed(false), Status::Fail);
        assert_eq!(Status::Fail.to_string(), "FAIL");
    }

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Status::Ok).unwrap(), "\"OK\"");
    }
}
