//! Pluggable run exporters.
//!
//! Each exporter serializes a run's event log and summary to files in an
//! output directory. The registry selects exporters by format name.

mod columnar;
mod html;
mod ndjson;
mod summary;
mod tabular;

pub use columnar::ParquetExporter;
pub use html::HtmlExporter;
pub use ndjson::NdjsonExporter;
pub use summary::JsonSummaryExporter;
pub use tabular::CsvExporter;

use crate::error::{Error, Result};
use pipesim_engine::RunOutput;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Writes a run's events and summary to a sink.
pub trait Exporter: Send + Sync {
    /// Format name used for selection (e.g., "csv", "html").
    fn format_name(&self) -> &'static str;

    /// Whether the exporter's backing implementation is present.
    ///
    /// Unavailable exporters still run, but only record why they skipped.
    fn is_available(&self) -> bool {
        true
    }

    /// Writes output files into `out_dir` and returns their paths.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    fn export(&self, run: &RunOutput, out_dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Ordered set of exporters.
pub struct ExporterRegistry {
    exporters: Vec<Box<dyn Exporter>>,
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ExporterRegistry {
    /// Creates a registry with every built-in exporter.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            exporters: Vec::new(),
        };

        registry.register(Box::new(CsvExporter));
        registry.register(Box::new(NdjsonExporter));
        registry.register(Box::new(JsonSummaryExporter));
        registry.register(Box::new(ParquetExporter));
        registry.register(Box::new(HtmlExporter));

        registry
    }

    /// Registers an exporter at the end of the list.
    pub fn register(&mut self, exporter: Box<dyn Exporter>) {
        self.exporters.push(exporter);
    }

    /// Returns the names of all registered formats.
    #[must_use]
    pub fn formats(&self) -> Vec<&'static str> {
        self.exporters.iter().map(|e| e.format_name()).collect()
    }

    /// Runs every registered exporter.
    ///
    /// # Errors
    ///
    /// Returns the first exporter error.
    pub fn export_all(&self, run: &RunOutput, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let all: Vec<&dyn Exporter> = self.exporters.iter().map(|e| &**e).collect();
        Self::export_with(&all, run, out_dir)
    }

    /// Runs only the named exporters, in registry order.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownFormat` if a name is not registered, or the
    /// first exporter error.
    pub fn export_formats(
        &self,
        run: &RunOutput,
        out_dir: &Path,
        formats: &[&str],
    ) -> Result<Vec<PathBuf>> {
        if let Some(unknown) = formats
            .iter()
            .find(|f| !self.exporters.iter().any(|e| e.format_name() == **f))
        {
            return Err(Error::UnknownFormat((*unknown).to_string()));
        }

        let selected: Vec<&dyn Exporter> = self
            .exporters
            .iter()
            .filter(|e| formats.contains(&e.format_name()))
            .map(|e| &**e)
            .collect();
        Self::export_with(&selected, run, out_dir)
    }

    fn export_with(
        exporters: &[&dyn Exporter],
        run: &RunOutput,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(out_dir)?;

        let mut written = Vec::new();
        for exporter in exporters {
            if !exporter.is_available() {
                warn!("Exporter {} is unavailable in this build", exporter.format_name());
            }
            let paths = exporter.export(run, out_dir)?;
            debug!("Exporter {} wrote {} file(s)", exporter.format_name(), paths.len());
            written.extend(paths);
        }

        info!("Wrote {} output file(s) to {}", written.len(), out_dir.display());
        Ok(written)
    }
}

/// Rounds a duration for display the same way in every tabular output.
pub(crate) fn format_seconds(seconds: f64) -> String {
    format!("{seconds:.4}")
}
