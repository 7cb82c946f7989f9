//! S3 implementation of [`UrlSigner`]

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::{presigning::PresigningConfig, Client as S3Client};
use chrono::Utc;
use common_types::TransferMethod;

use super::{SignedUrl, SigningError, SigningResult, TransferRequest, UrlSigner};

/// Signs `PutObject` / `GetObject` requests for a single bucket
pub struct S3UrlSigner {
    s3_client: Arc<S3Client>,
    bucket_name: String,
}

impl S3UrlSigner {
    /// Creates a new signer
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client, its credential chain is used for signing
    /// * `bucket_name` - Bucket every key is resolved against
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String) -> Self {
        Self {
            s3_client,
            bucket_name,
        }
    }

    /// Bucket this signer authorizes access to
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }
}

#[async_trait]
impl UrlSigner for S3UrlSigner {
    async fn presign(&self, request: &TransferRequest) -> SigningResult<SignedUrl> {
        let presigning_config = PresigningConfig::expires_in(request.expiry).map_err(|e| {
            SigningError::ConfigError(format!("Failed to create presigning config: {e}"))
        })?;

        let presigned = match request.method {
            TransferMethod::Upload => self
                .s3_client
                .put_object()
                .bucket(&self.bucket_name)
                .key(&request.object_key)
                .presigned(presigning_config)
                .await
                .map_err(|e| SigningError::PresignError(format!("PutObject: {e}")))?,
            TransferMethod::Download => self
                .s3_client
                .get_object()
                .bucket(&self.bucket_name)
                .key(&request.object_key)
                .presigned(presigning_config)
                .await
                .map_err(|e| SigningError::PresignError(format!("GetObject: {e}")))?,
        };

        Ok(SignedUrl {
            url: presigned.uri().to_string(),
            object_key: request.object_key.clone(),
            expires_at: Utc::now() + request.expiry,
        })
    }
}
