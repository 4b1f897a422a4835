//! Init command implementation.

use anyhow::{Context, Result};
use pipesim_engine::digest;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

/// Name of the sample config written by `init`.
pub const SAMPLE_CONFIG: &str = "pipeline.yml";

/// Runs the init command.
pub fn run(path: &str) -> Result<ExitCode> {
    let project_path = Path::new(path);

    info!("Initializing pipesim project at: {}", project_path.display());

    fs::create_dir_all(project_path)
        .with_context(|| format!("Failed to create directory: {}", project_path.display()))?;

    let config_path = project_path.join(SAMPLE_CONFIG);
    if config_path.exists() {
        info!("Skipped: {} (already exists)", config_path.display());
    } else {
        fs::write(&config_path, sample_config())
            .with_context(|| format!("Failed to create {SAMPLE_CONFIG}"))?;
        info!("Created: {}", config_path.display());
    }

    info!("Run it with: pipesim run --config {} --out build", config_path.display());
    Ok(ExitCode::SUCCESS)
}

/// A two-module pipeline where one test passes and one is pinned to a stale
/// digest.
fn sample_config() -> String {
    format!(
        r#"modules:
  - name: core
    payload: "src@abc123"
    seconds: 0.2
  - name: utils
    payload: "src@def456"
    seconds: 0.1

tests:
  - name: unit-core
    module: core
    seconds: 0.1
    expected_digest: "{core}"
  - name: unit-utils
    module: utils
    seconds: 0.1
    expected_digest: "WRONG_DIGEST"
"#,
        core = digest("src@abc123")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipesim_config::PipelineConfig;

    #[test]
    fn sample_config_is_valid() {
        let config = PipelineConfig::from_yaml_str(&sample_config()).unwrap();
        assert_eq!(config.modules.len(), 2);
        assert_eq!(config.tests.len(), 2);
    }

    #[test]
    fn init_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SAMPLE_CONFIG);
        fs::write(&path, "modules: []\n").unwrap();

        run(dir.path().to_str().unwrap()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "modules: []\n");
    }

    #[test]
    fn init_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("new-project");

        run(target.to_str().unwrap()).unwrap();

        assert!(target.join(SAMPLE_CONFIG).is_file());
    }
}
