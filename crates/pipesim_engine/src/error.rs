//! Error types for engine operations.

use crate::pipeline::Phase;
use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Test digest mismatches are not errors; they are reported as failed
/// [`TestResult`](crate::TestResult)s.
#[derive(Debug, Error)]
pub enum Error {
    /// The pipeline definition is invalid. No stage has run.
    #[error("configuration error: {0}")]
    Config(#[from] pipesim_config::Error),

    /// A run step was invoked out of order.
    #[error("pipeline is in phase {actual:?}, expected {expected:?}")]
    PhaseOrder {
        /// Phase the step requires.
        expected: Phase,
        /// Phase the pipeline was in.
        actual: Phase,
    },

    /// An engine invariant was broken mid-run.
    #[error("internal inconsistency: {0}")]
    Internal(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
