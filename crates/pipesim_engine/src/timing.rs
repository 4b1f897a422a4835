//! Simulated elapsed work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Wall-clock bounds observed around one simulated stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedRecord {
    /// When the stage started.
    pub started_at: DateTime<Utc>,
    /// When the stage ended.
    pub ended_at: DateTime<Utc>,
    /// Monotonic elapsed time.
    pub elapsed: Duration,
}

impl ElapsedRecord {
    /// A record with zero elapsed time.
    #[must_use]
    pub const fn instant(at: DateTime<Utc>) -> Self {
        Self {
            started_at: at,
            ended_at: at,
            elapsed: Duration::ZERO,
        }
    }

    /// Elapsed time in seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Blocks the calling thread to stand in for real work.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimingSimulator {
    max_stage: Option<Duration>,
}

impl TimingSimulator {
    /// Creates a simulator that sleeps for the full requested duration.
    #[must_use]
    pub const fn new() -> Self {
        Self { max_stage: None }
    }

    /// Creates a simulator whose sleeps never exceed `max_stage`.
    #[must_use]
    pub const fn capped(max_stage: Duration) -> Self {
        Self {
            max_stage: Some(max_stage),
        }
    }

    /// Returns the per-stage sleep cap, if any.
    #[must_use]
    pub const fn max_stage(&self) -> Option<Duration> {
        self.max_stage
    }

    /// Sleeps for approximately `seconds` and returns the observed bounds.
    ///
    /// Zero (or any non-positive value) returns immediately with
    /// `started_at == ended_at` and no elapsed time.
    pub fn simulate(&self, seconds: f64) -> ElapsedRecord {
        let started_at = Utc::now();
        if seconds.is_nan() || seconds <= 0.0 {
            return ElapsedRecord::instant(started_at);
        }

        let requested = Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX);
        let target = self.max_stage.map_or(requested, |cap| requested.min(cap));

        let clock = Instant::now();
        std::thread::sleep(target);
        let elapsed = clock.elapsed();

        let ended_at = chrono::Duration::from_std(elapsed)
            .ok()
            .and_then(|d| started_at.checked_add_signed(d))
            .unwrap_or(started_at);

        ElapsedRecord {
            started_at,
            ended_at,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_returns_immediately() {
        let record = TimingSimulator::new().simulate(0.0);
        assert_eq!(record.started_at, record.ended_at);
        assert_eq!(record.elapsed, Duration::ZERO);
        assert!(record.duration_seconds().abs() < f64::EPSILON);
    }

    #[test]
    fn short_sleep_takes_at_least_requested_time() {
        let record = TimingSimulator::new().simulate(0.02);
        assert!(record.elapsed >= Duration::from_millis(20));
        assert!(record.ended_at >= record.started_at);
    }

    #[test]
    fn cap_bounds_long_sleeps() {
        let sim = TimingSimulator::capped(Duration::from_millis(5));
        let record = sim.simulate(30.0);
        assert!(record.elapsed < Duration::from_secs(5));
    }

    #[test]
    fn nan_is_treated_as_zero() {
        let record = TimingSimulator::new().simulate(f64::NAN);
        assert_eq!(record.elapsed, Duration::ZERO);
    }
}
