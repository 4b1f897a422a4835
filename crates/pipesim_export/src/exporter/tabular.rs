//! Row-per-event CSV telemetry log.

use super::{format_seconds, Exporter};
use crate::error::Result;
use chrono::SecondsFormat;
use pipesim_engine::{RunOutput, StageEvent};
use std::path::{Path, PathBuf};

/// File name written by [`CsvExporter`].
pub const TELEMETRY_CSV: &str = "telemetry.csv";

const HEADER: [&str; 8] = [
    "seq",
    "stage",
    "name",
    "started_at",
    "ended_at",
    "duration_s",
    "status",
    "detail",
];

/// Writes `telemetry.csv`. The header is written even when there are no
/// events.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    /// Renders events as CSV text.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV writer fails.
    pub fn render(events: &[StageEvent]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADER)?;

        for event in events {
            writer.write_record([
                event.sequence.to_string(),
                event.stage.to_string(),
                event.name.clone(),
                event.started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                event.ended_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                format_seconds(event.duration_seconds),
                event.status.to_string(),
                event.detail.clone().unwrap_or_default(),
            ])?;
        }

        let bytes = writer.into_inner().map_err(csv::IntoInnerError::into_error)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Exporter for CsvExporter {
    fn format_name(&self) -> &'static str {
        "csv"
    }

    fn export(&self, run: &RunOutput, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let path = out_dir.join(TELEMETRY_CSV);
        std::fs::write(&path, Self::render(&run.events)?)?;
        Ok(vec![path])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::fixtures;

    #[test]
    fn renders_one_row_per_event() {
        let csv = CsvExporter::render(&fixtures::run().events).unwrap();
        insta::assert_snapshot!(csv, @r###"
        seq,stage,name,started_at,ended_at,duration_s,status,detail
        1,build,core,2024-01-01T12:00:00.000Z,2024-01-01T12:00:00.250Z,0.2500,OK,d1
        2,test,unit-core,2024-01-01T12:00:00.000Z,2024-01-01T12:00:00.125Z,0.1250,OK,
        3,test,unit-<bad>,2024-01-01T12:00:00.000Z,2024-01-01T12:00:00.000Z,0.0000,FAIL,"expected digest WRONG, got d1"
        "###);
    }

    #[test]
    fn empty_log_still_has_header() {
        let csv = CsvExporter::render(&[]).unwrap();
        assert_eq!(csv, "seq,stage,name,started_at,ended_at,duration_s,status,detail\n");
    }
}
