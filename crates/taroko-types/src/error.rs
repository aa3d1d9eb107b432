//! Error types for taroko.

use thiserror::Error;

/// Result type alias for taroko operations.
pub type Result<T> = std::result::Result<T, TarokoError>;

/// Errors that can occur while maintaining the archive.
///
/// Crate-local error types (fetch transport, archive I/O, aggregation)
/// are bridged into these variants at the run-loop seam.
#[derive(Error, Debug)]
pub enum TarokoError {
    /// Call against the external market-data source failed.
    #[error("Source error: {0}")]
    Source(String),

    /// Catalog could not be obtained or filtered.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Archive file operation failed.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Daily aggregation failed.
    #[error("Aggregation error: {0}")]
    Aggregate(String),

    /// Timestamp cell could not be interpreted.
    #[error(transparent)]
    Timestamp(#[from] TimestampError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error for timestamp cells that fit no accepted representation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// Neither an epoch integer nor a known textual form.
    #[error("Unrecognized timestamp: {0:?}")]
    Unrecognized(String),
}
