//! Error types for metadata operations
//!
//! Domain problems (a negative width, a format/compression mismatch) are
//! never errors: they are entries in a
//! [`ValidationReport`](crate::validation::ValidationReport). This type
//! only covers contract violations, bad configuration, cancelled disposal
//! and document scanning failures.

use thiserror::Error;

/// Error types for metadata operations
#[derive(Debug, Error)]
pub enum MetaError {
    /// No record was supplied to an operation that requires one
    #[error("Missing record: a metadata record is required")]
    MissingRecord,

    /// Invalid configuration value
    #[error("Bad config: {0}")]
    BadConfig(String),

    /// Asynchronous disposal was cancelled before it finished
    #[error("Disposal cancelled after {completed_groups} field group(s)")]
    Cancelled {
        /// Number of field groups fully cleared before cancellation
        completed_groups: usize,
    },

    /// Parse error (malformed SVG document)
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Operation not supported for this format
    #[error("Operation not supported: {0}")]
    Unsupported(String),
}

/// Result type alias for metadata operations
pub type MetaResult<T> = Result<T, MetaError>;
