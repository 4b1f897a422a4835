//! Append-only telemetry log of stage events.

use crate::result::Status;
use crate::timing::ElapsedRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// First sequence number assigned in a run.
pub const FIRST_SEQUENCE: u64 = 1;

/// Pipeline stage an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Module build.
    Build,
    /// Test run.
    Test,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build => write!(f, "build"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// One immutable telemetry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// Position in the run, starting at [`FIRST_SEQUENCE`].
    pub sequence: u64,
    /// Stage kind.
    pub stage: Stage,
    /// Module or test name.
    pub name: String,
    /// Stage start.
    pub started_at: DateTime<Utc>,
    /// Stage end.
    pub ended_at: DateTime<Utc>,
    /// Observed duration in seconds.
    pub duration_seconds: f64,
    /// Outcome.
    pub status: Status,
    /// Digest for builds, mismatch explanation for failed tests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Ordered, append-only event log for a single run.
///
/// The recorder is the only writer of [`StageEvent`]s. Events are never
/// removed or modified once appended.
#[derive(Debug, Default)]
pub struct TelemetryRecorder {
    events: Vec<StageEvent>,
}

impl TelemetryRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Appends an event, assigning the next sequence number.
    pub fn append(
        &mut self,
        stage: Stage,
        name: impl Into<String>,
        elapsed: &ElapsedRecord,
        status: Status,
        detail: Option<String>,
    ) -> &StageEvent {
        let sequence = self.next_sequence();
        self.events.push(StageEvent {
            sequence,
            stage,
            name: name.into(),
            started_at: elapsed.started_at,
            ended_at: elapsed.ended_at,
            duration_seconds: elapsed.duration_seconds(),
            status,
            detail,
        });
        &self.events[self.events.len() - 1]
    }

    /// Returns a snapshot of all events recorded so far.
    ///
    /// Later appends are not visible through the returned value.
    #[must_use]
    pub fn events(&self) -> Vec<StageEvent> {
        self.events.clone()
    }

    /// Consumes the recorder, yielding its events.
    #[must_use]
    pub fn into_events(self) -> Vec<StageEvent> {
        self.events
    }

    /// Number of events recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn next_sequence(&self) -> u64 {
        self.events
            .last()
            .map_or(FIRST_SEQUENCE, |last| last.sequence + 1)
    }
}
