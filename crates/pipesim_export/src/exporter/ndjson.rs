//! One JSON object per event, one event per line.

use super::Exporter;
use crate::error::Result;
use pipesim_engine::{RunOutput, StageEvent};
use std::path::{Path, PathBuf};

/// File name written by [`NdjsonExporter`].
pub const EVENTS_NDJSON: &str = "events.ndjson";

/// Writes `events.ndjson`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NdjsonExporter;

impl NdjsonExporter {
    /// Renders events as newline-delimited JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if an event cannot be serialized.
    pub fn render(events: &[StageEvent]) -> Result<String> {
        let mut out = String::new();
        for event in events {
            out.push_str(&serde_json::to_string(event)?);
            out.push('\n');
        }
        Ok(out)
    }
}

impl Exporter for NdjsonExporter {
    fn format_name(&self) -> &'static str {
        "ndjson"
    }

    fn export(&self, run: &RunOutput, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let path = out_dir.join(EVENTS_NDJSON);
        std::fs::write(&path, Self::render(&run.events)?)?;
        Ok(vec![path])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::fixtures;

    #[test]
    fn each_line_is_an_event() {
        let run = fixtures::run();
        let text = NdjsonExporter::render(&run.events).unwrap();
        let parsed: Vec<StageEvent> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(parsed, run.events);
    }

    #[test]
    fn passing_test_line_omits_detail() {
        let text = NdjsonExporter::render(&fixtures::run().events).unwrap();
        let second = text.lines().nth(1).unwrap();
        assert!(second.contains("\"status\":\"OK\""));
        assert!(!second.contains("detail"));
    }

    #[test]
    fn empty_log_is_empty_file() {
        assert!(NdjsonExporter::render(&[]).unwrap().is_empty());
    }
}
