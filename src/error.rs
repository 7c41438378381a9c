//! Error types for evoke.

use thiserror::Error;

/// Result type for evoke operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for evoke operations.
///
/// Resolution itself has no failure modes: missing attributes fall back to
/// documented defaults and unresolvable mentions become statistics. Errors
/// only arise at the edges (malformed construction input, report output).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid input provided (e.g., a link to an entity the knowledge base
    /// does not contain).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Report serialization failed.
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
