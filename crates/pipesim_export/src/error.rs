//! Error types for export operations.

use thiserror::Error;

/// Errors that can occur while writing run outputs.
#[derive(Debug, Error)]
pub enum Error {
    /// No exporter is registered under this name.
    #[error("unknown export format: {0}")]
    UnknownFormat(String),

    /// CSV writing error.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Arrow record batch error.
    #[cfg(feature = "parquet")]
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet writer error.
    #[cfg(feature = "parquet")]
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, Error>;
