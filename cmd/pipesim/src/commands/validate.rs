//! Validate command implementation.

use anyhow::{Context, Result};
use pipesim_config::PipelineConfig;
use std::process::ExitCode;
use tracing::info;

/// Runs the validate command.
pub fn run(config_path: &str) -> Result<ExitCode> {
    let config = PipelineConfig::load(config_path)
        .with_context(|| format!("Failed to load config: {config_path}"))?;

    info!(
        "Config is valid: {} modules, {} tests",
        config.modules.len(),
        config.tests.len()
    );
    Ok(ExitCode::SUCCESS)
}
