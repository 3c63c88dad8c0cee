//! Error types for the docexp library.
//!
//! All fallible operations return [`Result`], whose error type is
//! [`DocexError`]. Most of the expansion pipeline recovers from errors
//! locally (logging and degrading to an empty result) rather than
//! propagating them, so the variants here mostly surface at the edges:
//! index access, input parsing, and configuration loading.

use std::io;

use thiserror::Error;

/// The main error type for docexp operations.
#[derive(Error, Debug)]
pub enum DocexError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Index-related errors (lookup failures, bad document ids)
    #[error("Index error: {0}")]
    Index(String),

    /// Query-related errors (empty pseudo-queries, retrieval failures)
    #[error("Query error: {0}")]
    Query(String),

    /// Input-file parsing errors
    #[error("Input error: {0}")]
    Input(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with DocexError.
pub type Result<T> = std::result::Result<T, DocexError>;

impl DocexError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        DocexError::Index(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        DocexError::Query(msg.into())
    }

    /// Create a new input error.
    pub fn input<S: Into<String>>(msg: S) -> Self {
        DocexError::Input(msg.into())
    }

    /// Create a new config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        DocexError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        DocexError::Other(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        DocexError::Other(format!("Not found: {}", msg.into()))
    }
}
