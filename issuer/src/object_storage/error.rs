//! Error types for URL signing

use thiserror::Error;

/// Result type for signing operations
pub type SigningResult<T> = Result<T, SigningError>;

/// Errors that can occur while producing a signed URL
#[derive(Error, Debug)]
pub enum SigningError {
    /// Presigning configuration rejected (e.g. expiry out of range)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The SDK failed to sign the request
    #[error("Presign error: {0}")]
    PresignError(String),
}
