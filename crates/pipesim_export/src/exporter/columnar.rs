//! Columnar export.
//!
//! With the `parquet` feature, writes the telemetry log and the test results
//! as two Parquet files. Without it, the exporter reports itself unavailable
//! and leaves a note in their place. A missing columnar backend never fails
//! a run.

use super::Exporter;
use crate::error::Result;
use pipesim_engine::RunOutput;
use std::path::{Path, PathBuf};

/// Telemetry rows, one per event.
pub const TELEMETRY_PARQUET: &str = "telemetry.parquet";

/// Test result rows, one per test.
pub const RESULTS_PARQUET: &str = "results.parquet";

/// Note written when columnar export is skipped.
pub const PARQUET_SKIPPED: &str = "parquet_export_failed.txt";

/// Writes `telemetry.parquet` and `results.parquet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetExporter;

impl Exporter for ParquetExporter {
    fn format_name(&self) -> &'static str {
        "parquet"
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "parquet")
    }

    #[cfg(feature = "parquet")]
    fn export(&self, run: &RunOutput, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let telemetry = out_dir.join(TELEMETRY_PARQUET);
        writer::write_batch(&telemetry, &writer::telemetry_batch(&run.events)?)?;

        let results = out_dir.join(RESULTS_PARQUET);
        writer::write_batch(&results, &writer::results_batch(&run.summary.tests)?)?;

        Ok(vec![telemetry, results])
    }

    #[cfg(not(feature = "parquet"))]
    fn export(&self, run: &RunOutput, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let path = out_dir.join(PARQUET_SKIPPED);
        let note = format!(
            "Parquet export skipped: built without the `parquet` feature.\n\
             {} telemetry rows and {} test rows were not written.\n\
             Rebuild with `--features parquet` to enable.\n",
            run.events.len(),
            run.summary.tests.len()
        );
        std::fs::write(&path, note)?;
        tracing::warn!("Parquet export skipped, see {}", path.display());
        Ok(vec![path])
    }
}

#[cfg(feature = "parquet")]
mod writer {
    use crate::error::Result;
    use arrow::array::{ArrayRef, BooleanArray, Float64Array, StringArray, UInt64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use chrono::SecondsFormat;
    use parquet::arrow::ArrowWriter;
    use pipesim_engine::{StageEvent, TestResult};
    use std::fs::File;
    use std::path::Path;
    use std::sync::Arc;

    pub fn telemetry_batch(events: &[StageEvent]) -> Result<RecordBatch> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("seq", DataType::UInt64, false),
            Field::new("stage", DataType::Utf8, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("started_at", DataType::Utf8, false),
            Field::new("ended_at", DataType::Utf8, false),
            Field::new("duration_s", DataType::Float64, false),
            Field::new("status", DataType::Utf8, false),
            Field::new("detail", DataType::Utf8, true),
        ]));

        let columns: Vec<ArrayRef> = vec![
            Arc::new(UInt64Array::from_iter_values(events.iter().map(|e| e.sequence))),
            Arc::new(StringArray::from_iter_values(
                events.iter().map(|e| e.stage.to_string()),
            )),
            Arc::new(StringArray::from_iter_values(events.iter().map(|e| e.name.as_str()))),
            Arc::new(StringArray::from_iter_values(
                events
                    .iter()
                    .map(|e| e.started_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            )),
            Arc::new(StringArray::from_iter_values(
                events
                    .iter()
                    .map(|e| e.ended_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            )),
            Arc::new(Float64Array::from_iter_values(
                events.iter().map(|e| e.duration_seconds),
            )),
            Arc::new(StringArray::from_iter_values(
                events.iter().map(|e| e.status.to_string()),
            )),
            Arc::new(StringArray::from(
                events.iter().map(|e| e.detail.clone()).collect::<Vec<_>>(),
            )),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    pub fn results_batch(tests: &[TestResult]) -> Result<RecordBatch> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("name", DataType::Utf8, false),
            Field::new("module", DataType::Utf8, false),
            Field::new("actual_digest", DataType::Utf8, false),
            Field::new("expected_digest", DataType::Utf8, true),
            Field::new("ok", DataType::Boolean, false),
            Field::new("duration_s", DataType::Float64, false),
        ]));

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(tests.iter().map(|t| t.name.as_str()))),
            Arc::new(StringArray::from_iter_values(tests.iter().map(|t| t.module.as_str()))),
            Arc::new(StringArray::from_iter_values(
                tests.iter().map(|t| t.actual_digest.as_str()),
            )),
            Arc::new(StringArray::from(
                tests
                    .iter()
                    .map(|t| t.expected_digest.clone())
                    .collect::<Vec<_>>(),
            )),
            Arc::new(BooleanArray::from(
                tests.iter().map(|t| t.passed).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from_iter_values(
                tests.iter().map(|t| t.duration_seconds),
            )),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    pub fn write_batch(path: &Path, batch: &RecordBatch) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
        writer.write(batch)?;
        writer.close()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::fixtures;

    #[test]
    fn availability_follows_feature() {
        assert_eq!(ParquetExporter.is_available(), cfg!(feature = "parquet"));
    }

    #[cfg(not(feature = "parquet"))]
    #[test]
    fn writes_skip_note_without_backend() {
        let dir = tempfile::tempdir().unwrap();
        let written = ParquetExporter.export(&fixtures::run(), dir.path()).unwrap();
        assert_eq!(written, [dir.path().join(PARQUET_SKIPPED)]);
        let note = std::fs::read_to_string(&written[0]).unwrap();
        assert!(note.contains("3 telemetry rows"));
        assert!(!dir.path().join(TELEMETRY_PARQUET).exists());
    }

    #[cfg(feature = "parquet")]
    #[test]
    fn writes_readable_parquet_files() {
        use arrow::array::{Array, BooleanArray, StringArray};
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        fn read(path: &Path) -> Vec<arrow::record_batch::RecordBatch> {
            let file = std::fs::File::open(path).unwrap();
            ParquetRecordBatchReaderBuilder::try_new(file)
                .unwrap()
                .build()
                .unwrap()
                .collect::<std::result::Result<Vec<_>, _>>()
                .unwrap()
        }

        let dir = tempfile::tempdir().unwrap();
        let written = ParquetExporter.export(&fixtures::run(), dir.path()).unwrap();
        assert_eq!(
            written,
            [dir.path().join(TELEMETRY_PARQUET), dir.path().join(RESULTS_PARQUET)]
        );
        assert!(!dir.path().join(PARQUET_SKIPPED).exists());

        let telemetry = read(&written[0]);
        let rows: usize = telemetry.iter().map(arrow::record_batch::RecordBatch::num_rows).sum();
        assert_eq!(rows, 3);
        let names = telemetry[0]
            .column_by_name("name")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(names.value(0), "core");
        let detail = telemetry[0].column_by_name("detail").unwrap();
        assert!(detail.is_null(1));

        let results = read(&written[1]);
        let ok = results[0]
            .column_by_name("ok")
            .unwrap()
            .as_any()
            .downcast_ref::<BooleanArray>()
            .unwrap();
        assert_eq!(results[0].num_rows(), 2);
        assert!(ok.value(0));
        assert!(!ok.value(1));
    }
}
