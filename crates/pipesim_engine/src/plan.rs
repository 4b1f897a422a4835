//! Dry description of what a pipeline would run.

use crate::digest::digest;
use pipesim_config::PipelineConfig;
use serde::{Deserialize, Serialize};

/// Modules and tests as they would execute, without running anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Modules in build order.
    pub modules: Vec<PlannedModule>,
    /// Tests in run order.
    pub tests: Vec<PlannedTest>,
}

/// A module entry in a [`Plan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedModule {
    /// Module name.
    pub name: String,
    /// Payload.
    pub payload: String,
    /// Configured build duration.
    pub seconds: f64,
    /// Digest the build would produce, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_digest: Option<String>,
}

/// A test entry in a [`Plan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedTest {
    /// Test name.
    pub name: String,
    /// Module under test.
    pub module: String,
    /// Configured run duration.
    pub seconds: f64,
    /// Whether the test pins an expected digest.
    pub expects_digest: bool,
}

impl Plan {
    /// Describes `config`. With `include_digests`, each module carries the
    /// digest its build would produce. Nothing sleeps.
    #[must_use]
    pub fn new(config: &PipelineConfig, include_digests: bool) -> Self {
        let modules = config
            .modules
            .iter()
            .map(|m| PlannedModule {
                name: m.name.clone(),
                payload: m.payload.clone(),
                seconds: m.simulated_seconds,
                expected_digest: include_digests.then(|| digest(&m.payload)),
            })
            .collect();

        let tests = config
            .tests
            .iter()
            .map(|t| PlannedTest {
                name: t.name.clone(),
                module: t.module_ref.clone(),
                seconds: t.simulated_seconds,
                expects_digest: t.expected_digest.is_some(),
            })
            .collect();

        Self { modules, tests }
    }
}
