//! Output adapters for pipesim runs.
//!
//! Every exporter consumes the same [`RunOutput`](pipesim_engine::RunOutput)
//! and writes one or more files into an output directory:
//!
//! | format    | files                                        |
//! |-----------|----------------------------------------------|
//! | `csv`     | `telemetry.csv`                              |
//! | `ndjson`  | `events.ndjson`                              |
//! | `json`    | `results.json`                               |
//! | `parquet` | `telemetry.parquet`, `results.parquet`       |
//! | `html`    | `report.html`                                |
//!
//! # Example
//!
//! ```rust,ignore
//! use pipesim_export::ExporterRegistry;
//!
//! let registry = ExporterRegistry::new();
//! let written = registry.export_all(&output, Path::new("build"))?;
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::format_push_string)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod exporter;

pub use error::{Error, Result};
pub use exporter::{
    CsvExporter, Exporter, ExporterRegistry, HtmlExporter, JsonSummaryExporter, NdjsonExporter,
    ParquetExporter,
};
