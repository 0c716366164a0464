//! Common error types for the Clauson tools

use thiserror::Error;

/// Common result type for Clauson operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Clauson crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backing store could not be reached before the run started
    #[error("Connection error: {0}")]
    Connection(String),

    /// A dataset file cannot be read or is not well-formed
    #[error("File error ({file}): {message}")]
    FileParse { file: String, message: String },

    /// A single raw entry could not be transformed or persisted
    #[error("Entry error ({word}): {message}")]
    EntryTransform { word: String, message: String },

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Any other failure that aborts a run
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True for errors that are recorded in the run report instead of aborting the run
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::FileParse { .. } | Error::EntryTransform { .. })
    }
}
