//! Common error types for tanker

use thiserror::Error;

/// Common result type for tanker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the collector and its fetch capabilities
#[derive(Error, Debug)]
pub enum Error {
    /// `fields(...)` called without a preceding `item(...)` / `collection(...)`
    #[error("Usage error: fields() called with no pending item or collection")]
    NoPendingTarget,

    /// Invalid user input or configuration value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Failure raised by a fetch capability backed by some other store
    #[error("Fetch error: {0}")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap an arbitrary backend error as a fetch failure
    pub fn fetch<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Fetch(err.into())
    }
}
