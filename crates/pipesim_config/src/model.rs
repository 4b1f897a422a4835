//! Typed pipeline model.
//!
//! Values of these types are produced at the config boundary and are
//! immutable once a run starts.

use serde::{Deserialize, Serialize};

/// A named unit of simulated build input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Unique module name.
    pub name: String,
    /// Content payload the digest is computed from.
    pub payload: String,
    /// Simulated build duration in seconds.
    pub simulated_seconds: f64,
}

/// A named check bound to one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Unique test name.
    pub name: String,
    /// Name of the module under test.
    pub module_ref: String,
    /// Simulated run duration in seconds.
    pub simulated_seconds: f64,
    /// Digest the module is expected to produce. `None` means any digest passes.
    pub expected_digest: Option<String>,
}

/// A decoded pipeline: modules and tests in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Modules in build order.
    pub modules: Vec<Module>,
    /// Tests in run order.
    pub tests: Vec<TestCase>,
}

impl Module {
    /// Creates a new module.
    #[must_use]
    pub fn new(name: impl Into<String>, payload: impl Into<String>, simulated_seconds: f64) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
            simulated_seconds,
        }
    }
}

impl TestCase {
    /// Creates a test with no expected digest.
    #[must_use]
    pub fn new(name: impl Into<String>, module_ref: impl Into<String>, simulated_seconds: f64) -> Self {
        Self {
            name: name.into(),
            module_ref: module_ref.into(),
            simulated_seconds,
            expected_digest: None,
        }
    }

    /// Sets the expected digest.
    #[must_use]
    pub fn expecting(mut self, digest: impl Into<String>) -> Self {
        self.expected_digest = Some(digest.into());
        self
    }
}

impl PipelineConfig {
    /// Creates a config from already-typed parts.
    #[must_use]
    pub const fn new(modules: Vec<Module>, tests: Vec<TestCase>) -> Self {
        Self { modules, tests }
    }

    /// Looks up a module by name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Returns true if the pipeline declares neither modules nor tests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.tests.is_empty()
    }
}
