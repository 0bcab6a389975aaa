//! Error types for trace file operations.

use std::io;
use thiserror::Error;

/// Result type for trace file operations
pub type Result<T> = std::result::Result<T, TraceFileError>;

/// Errors that can occur while working with a trace file and its metadata
#[derive(Error, Debug)]
pub enum TraceFileError {
    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Metadata or trace JSON could not be parsed or written
    #[error("Malformed metadata: {0}")]
    Meta(#[from] serde_json::Error),

    /// Operation requires metadata, but none is attached
    #[error("No metadata attached to trace file")]
    MissingMetadata,

    /// Operation requires the main file path, but none is set
    #[error("Trace file has no source path")]
    MissingSourcePath,

    /// Operation requires at least one trace in the logical view
    #[error("Logical trace view is empty")]
    EmptyView,

    /// Logical index past the end of the view
    #[error("Trace index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A position produced a distance that is NaN or infinite
    #[error("Non-finite distance at logical trace {index}")]
    NonFiniteDistance { index: usize },

    /// Metadata and raw traces are out of sync
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl TraceFileError {
    /// True for errors that indicate a caller bug rather than a data or I/O problem.
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            TraceFileError::MissingMetadata
                | TraceFileError::MissingSourcePath
                | TraceFileError::EmptyView
                | TraceFileError::IndexOutOfBounds { .. }
                | TraceFileError::InvariantViolation(_)
        )
    }
}
