//! Common error types for newsdesk

use thiserror::Error;

/// Common result type for newsdesk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Library-level faults: storage, filesystem, and configuration. Request
/// errors (validation, not-found, conflicts) belong to the service crate's
/// API error type, not here.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
