//! Run command implementation.

use anyhow::{Context, Result};
use pipesim_config::PipelineConfig;
use pipesim_engine::{run_with, RunOptions};
use pipesim_export::ExporterRegistry;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error, info};

/// Exit code when at least one test failed.
const EXIT_TESTS_FAILED: u8 = 1;

/// Runs the pipeline and writes outputs.
pub fn run(
    config_path: &str,
    out_dir: &str,
    dry_run: bool,
    formats: &[String],
    max_stage_seconds: f64,
) -> Result<ExitCode> {
    info!("Running pipeline: {}", config_path);

    // Load and validate config
    let config = PipelineConfig::load(config_path)
        .with_context(|| format!("Failed to load config: {config_path}"))?;

    let max_stage = Duration::try_from_secs_f64(max_stage_seconds)
        .with_context(|| format!("Invalid --max-stage-seconds: {max_stage_seconds}"))?;

    // Simulate
    let output = run_with(
        &config.modules,
        &config.tests,
        RunOptions {
            dry_run,
            max_stage: Some(max_stage),
        },
    )
    .with_context(|| "Pipeline run failed")?;

    // Export
    let registry = ExporterRegistry::new();
    let out = Path::new(out_dir);
    let written = if formats.is_empty() {
        registry.export_all(&output, out)
    } else {
        let names: Vec<&str> = formats.iter().map(String::as_str).collect();
        registry.export_formats(&output, out, &names)
    }
    .with_context(|| format!("Failed to write outputs to: {out_dir}"))?;
    for path in &written {
        debug!("Wrote: {}", path.display());
    }

    // Report
    let summary = &output.summary;
    info!(
        "Tests passed: {}/{} ({} artifacts, {:.4}s simulated)",
        summary.passed(),
        summary.tests.len(),
        summary.modules.len(),
        summary.total_duration_seconds
    );
    for test in summary.tests.iter().filter(|t| !t.passed) {
        error!(
            "[FAIL] {} (module {}): expected {}, got {}",
            test.name,
            test.module,
            test.expected_digest.as_deref().unwrap_or("-"),
            test.actual_digest
        );
    }

    if summary.is_ok() {
        info!("Pipeline passed");
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_TESTS_FAILED))
    }
}
