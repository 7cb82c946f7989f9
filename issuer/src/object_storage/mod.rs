//! Signed-URL generation against the object store
mod error;
mod s3;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common_types::TransferMethod;

pub use error::{SigningError, SigningResult};
pub use s3::S3UrlSigner;

/// A single authorization request, dropped as soon as the URL is produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Key of the object inside the configured bucket
    pub object_key: String,
    /// Operation to authorize
    pub method: TransferMethod,
    /// How long the URL stays valid
    pub expiry: Duration,
}

impl TransferRequest {
    /// Authorization to write `object_key`
    #[must_use]
    pub fn upload(object_key: impl Into<String>, expiry: Duration) -> Self {
        Self {
            object_key: object_key.into(),
            method: TransferMethod::Upload,
            expiry,
        }
    }

    /// Authorization to read `object_key`
    #[must_use]
    pub fn download(object_key: impl Into<String>, expiry: Duration) -> Self {
        Self {
            object_key: object_key.into(),
            method: TransferMethod::Download,
            expiry,
        }
    }
}

/// Presigned URL with expiration information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    /// The presigned URL
    pub url: String,
    /// Key the URL is bound to
    pub object_key: String,
    /// UTC timestamp when the URL expires
    pub expires_at: DateTime<Utc>,
}

/// Produces signed URLs for a [`TransferRequest`]
///
/// Implementations must not write any state; signing the same request twice is
/// always safe.
#[async_trait]
pub trait UrlSigner: Send + Sync {
    /// Signs `request`
    ///
    /// # Errors
    ///
    /// Returns a [`SigningError`] when the request cannot be signed
    async fn presign(&self, request: &TransferRequest) -> SigningResult<SignedUrl>;
}
