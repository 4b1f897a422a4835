//! Build/test pipeline simulation engine for pipesim.
//!
//! The engine is **single-threaded and deterministic**:
//! - Modules build in declaration order, then tests run in declaration order
//! - Digests depend only on payloads
//! - Every stage transition is appended to an ordered telemetry log
//!
//! Each call to [`run`] owns a fresh [`Pipeline`] run context; nothing is
//! shared between runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use pipesim_config::{Module, TestCase};
//! use pipesim_engine::{digest, run, Status};
//!
//! let modules = vec![Module::new("core", "src@abc123", 0.0)];
//! let tests = vec![TestCase::new("unit-core", "core", 0.0).expecting(digest("src@abc123"))];
//!
//! let output = run(&modules, &tests, false)?;
//! assert_eq!(output.summary.overall_status, Status::Ok);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod aggregate;
pub mod digest;
pub mod error;
pub mod pipeline;
pub mod plan;
pub mod result;
pub mod telemetry;
pub mod timing;

pub use aggregate::aggregate;
pub use digest::digest;
pub use error::{Error, Result};
pub use pipeline::{run, run_with, Phase, Pipeline, RunOptions, RunOutput};
pub use plan::{Plan, PlannedModule, PlannedTest};
pub use result::{BuildResult, PipelineSummary, Status, TestResult};
pub use telemetry::{Stage, StageEvent, TelemetryRecorder};
pub use timing::{ElapsedRecord, TimingSimulator};
