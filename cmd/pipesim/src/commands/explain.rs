//! Explain command implementation.

use anyhow::{Context, Result};
use pipesim_config::PipelineConfig;
use pipesim_engine::Plan;
use std::process::ExitCode;

/// Prints the pipeline plan as JSON on stdout.
pub fn run(config_path: &str, include_digests: bool) -> Result<ExitCode> {
    println!("{}", render(config_path, include_digests)?);
    Ok(ExitCode::SUCCESS)
}

/// Loads `config_path` and renders its plan as pretty JSON.
fn render(config_path: &str, include_digests: bool) -> Result<String> {
    let config = PipelineConfig::load(config_path)
        .with_context(|| format!("Failed to load config: {config_path}"))?;

    let plan = Plan::new(&config, include_digests);
    serde_json::to_string_pretty(&plan).with_context(|| "Failed to serialize plan")
}
