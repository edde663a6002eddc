//! Error types for quill.

use thiserror::Error;

/// Result type alias using quill's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for quill operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Key-value backend failed to read or write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Key-value backend refused a write because it is full
    #[error("Storage quota exceeded: {needed} bytes needed, {limit} bytes allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tag already present in the registry
    #[error("Tag already exists: {0}")]
    DuplicateTag(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Remote service answered with an application-level failure
    #[error("Service error: {message}")]
    Service { code: Option<i64>, message: String },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Service error without a vendor code.
    pub fn service(message: impl Into<String>) -> Self {
        Error::Service {
            code: None,
            message: message.into(),
        }
    }

    /// Vendor error code carried by a [`Error::Service`], if any.
    pub fn service_code(&self) -> Option<i64> {
        match self {
            Error::Service { code, .. } => *code,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
