//! Error types for the corrigo crate.

use thiserror::Error;

/// Errors produced by dictionary construction, ordered lookup and corpus
/// ingestion.
#[derive(Debug, Error)]
pub enum CorrigoError {
    /// A constructor or call argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A lookup iterator has no further results to deliver.
    #[error("exhausted: {0}")]
    Exhausted(String),

    /// An operation was attempted in a state that no longer allows it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A line of ingested input did not match the expected format.
    #[error("format error at line {line}: {message}: `{content}`")]
    FileFormat {
        /// 1-based number of the offending line.
        line: usize,
        /// What was expected of the line.
        message: String,
        /// The offending line, trimmed.
        content: String,
    },

    /// An I/O error while reading ingested input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CorrigoError {
    /// Create an invalid argument error.
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        CorrigoError::InvalidArgument(message.into())
    }

    /// Create an exhausted error.
    pub fn exhausted<S: Into<String>>(message: S) -> Self {
        CorrigoError::Exhausted(message.into())
    }

    /// Create an invalid state error.
    pub fn invalid_state<S: Into<String>>(message: S) -> Self {
        CorrigoError::InvalidState(message.into())
    }

    /// Create a file format error for the given 1-based line number.
    pub fn file_format<M: Into<String>, C: Into<String>>(
        line: usize,
        message: M,
        content: C,
    ) -> Self {
        CorrigoError::FileFormat {
            line,
            message: message.into(),
            content: content.into(),
        }
    }
}

/// Result type for corrigo operations.
pub type Result<T> = std::result::Result<T, CorrigoError>;
