//! Pipeline config loading from YAML.

use crate::error::{Error, Result};
use crate::model::{Module, PipelineConfig, TestCase};
use crate::validate::validate;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use tracing::{debug, info};

/// Build duration used when a module omits `seconds`.
pub const DEFAULT_MODULE_SECONDS: f64 = 0.2;

/// Run duration used when a test omits `seconds`.
pub const DEFAULT_TEST_SECONDS: f64 = 0.1;

/// Raw document shape. Both lists may be absent or null.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    modules: Option<Vec<RawModule>>,
    #[serde(default)]
    tests: Option<Vec<RawTest>>,
}

#[derive(Debug, Deserialize)]
struct RawModule {
    #[serde(default, deserialize_with = "scalar_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    payload: Option<String>,
    #[serde(default)]
    seconds: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawTest {
    #[serde(default, deserialize_with = "scalar_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    module: Option<String>,
    #[serde(default)]
    seconds: Option<f64>,
    #[serde(default, deserialize_with = "scalar_string")]
    expected_digest: Option<String>,
}

/// Reads a text field that YAML may have typed as a number or boolean
/// (`payload: 123`). Sequences and mappings are still rejected.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    use serde_yaml::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string, found {}",
            kind(&other)
        ))),
    }
}

const fn kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
        _ => "a scalar",
    }
}

impl RawModule {
    fn into_module(self) -> Result<Module> {
        let name = trimmed(self.name).ok_or(Error::EmptyModuleName)?;
        let payload = self.payload.ok_or_else(|| Error::MissingPayload(name.clone()))?;
        let seconds = self.seconds.unwrap_or(DEFAULT_MODULE_SECONDS);
        Ok(Module::new(name, payload, seconds))
    }
}

impl RawTest {
    fn into_test(self) -> Result<TestCase> {
        let name = trimmed(self.name).ok_or(Error::EmptyTestName)?;
        Ok(TestCase {
            name,
            module_ref: trimmed(self.module).unwrap_or_default(),
            simulated_seconds: self.seconds.unwrap_or(DEFAULT_TEST_SECONDS),
            expected_digest: self.expected_digest,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl PipelineConfig {
    /// Parses and validates a pipeline config from YAML text.
    ///
    /// An empty document is an empty pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, the top level is not a
    /// mapping, or validation fails.
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(input)?;
        let raw = match value {
            serde_yaml::Value::Null => RawConfig::default(),
            serde_yaml::Value::Mapping(_) => serde_yaml::from_value(value)?,
            _ => return Err(Error::NotMapping),
        };

        let modules = raw
            .modules
            .unwrap_or_default()
            .into_iter()
            .map(RawModule::into_module)
            .collect::<Result<Vec<_>>>()?;
        let tests = raw
            .tests
            .unwrap_or_default()
            .into_iter()
            .map(RawTest::into_test)
            .collect::<Result<Vec<_>>>()?;

        let config = Self::new(modules, tests);
        validate(&config.modules, &config.tests)?;
        debug!(
            modules = config.modules.len(),
            tests = config.tests.len(),
            "decoded pipeline config"
        );
        Ok(config)
    }

    /// Loads and validates a pipeline config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the config is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        info!(
            "Loaded pipeline config from {} ({} modules, {} tests)",
            path.display(),
            config.modules.len(),
            config.tests.len()
        );
        Ok(config)
    }
}
