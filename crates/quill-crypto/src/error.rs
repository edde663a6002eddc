//! Error types for password hashing.

use thiserror::Error;

/// Password hashing errors.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Argon2 parameters rejected.
    #[error("Invalid KDF parameters: {0}")]
    InvalidParams(String),

    /// Hashing failed.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Stored value is not a PHC hash string.
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    /// Password rejected before hashing.
    #[error("Invalid password: {0}")]
    InvalidPassword(String),
}

/// Result type for password hashing.
pub type CryptoResult<T> = Result<T, CryptoError>;
