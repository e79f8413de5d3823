//! Error types for folio.

use std::io;
use thiserror::Error;

/// Result type alias for folio operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in folio operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing storage could not be read or written.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] io::Error),

    /// A stored slot holds JSON that does not match its schema.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Import payload was unparsable or had the wrong shape.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// No message with the given id.
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// A command-line argument could not be interpreted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Storage failure that did not originate from the OS.
    pub(crate) fn unavailable(reason: &str) -> Self {
        Self::StorageUnavailable(io::Error::other(reason.to_string()))
    }
}
