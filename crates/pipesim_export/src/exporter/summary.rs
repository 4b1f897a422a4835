//! Single JSON summary document.

use super::Exporter;
use crate::error::Result;
use pipesim_engine::RunOutput;
use std::path::{Path, PathBuf};

/// File name written by [`JsonSummaryExporter`].
pub const RESULTS_JSON: &str = "results.json";

/// Writes `results.json` with the pretty-printed run summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSummaryExporter;

impl Exporter for JsonSummaryExporter {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn export(&self, run: &RunOutput, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let path = out_dir.join(RESULTS_JSON);
        let content = serde_json::to_string_pretty(&run.summary)?;
        std::fs::write(&path, content)?;
        Ok(vec![path])
    }
}
