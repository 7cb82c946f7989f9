//! Error types for the upload sequence

use reqwest::StatusCode;
use thiserror::Error;

/// A step of the upload sequence failed
///
/// The display text is what the user sees after the `Upload failed: ` prefix.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Issuer refused the upload authorization or answered without `url`/`key`
    #[error("Failed to get upload URL")]
    UploadUrl,

    /// Issuer authorized a different key than the one requested
    #[error("Failed to get upload URL: issuer returned key {returned:?} for {requested:?}")]
    KeyMismatch {
        /// Key sent to the issuer
        requested: String,
        /// Key the issuer signed
        returned: String,
    },

    /// Object store rejected the bytes
    #[error("Failed to upload file to S3: {status}")]
    Transfer {
        /// Status returned by the object store
        status: StatusCode,
    },

    /// Issuer refused the download authorization
    #[error("Failed to get download URL")]
    DownloadUrl,

    /// Request never got an HTTP response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// An event arrived in a state that cannot accept it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// A transfer is in flight
    #[error("An upload is already in progress")]
    Busy,

    /// Upload requested with nothing selected
    #[error("No file selected")]
    NoFileSelected,

    /// Any other out-of-order event
    #[error("{event} is not valid while {state}")]
    Unexpected {
        /// Name of the rejected event
        event: &'static str,
        /// Name of the current state
        state: &'static str,
    },
}
