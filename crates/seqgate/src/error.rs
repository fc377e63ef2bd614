//! Error types for the Seqgate library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Seqgate operations.
///
/// Note that per-file validation never surfaces these errors: validators
/// convert every failure mode into a FAIL `ValidationRecord`. The error
/// type exists for the operations that legitimately can fail for the
/// caller — report persistence and low-level file helpers.
#[derive(Debug, Error)]
pub enum SeqgateError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library while reading tabular data.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error loading or saving the accumulated report.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl SeqgateError {
    /// Wrap an `io::Error` with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SeqgateError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for Seqgate operations.
pub type Result<T> = std::result::Result<T, SeqgateError>;
