//! Network side of the uploader

use async_trait::async_trait;
use bytes::Bytes;
use common_types::{SignedUrlResponse, UploadUrlRequest};
use mime::Mime;
use reqwest::{header::CONTENT_TYPE, Client};
use tracing::instrument;
use url::Url;

use crate::{config::UploaderConfig, error::UploadError};

/// The three network steps of an upload
#[async_trait]
pub trait TransferBackend: Send + Sync {
    /// Asks the issuer to authorize an upload
    ///
    /// # Errors
    ///
    /// [`UploadError::UploadUrl`] unless the issuer answers with a `url` and `key`
    async fn request_upload_url(
        &self,
        request: &UploadUrlRequest,
    ) -> Result<SignedUrlResponse, UploadError>;

    /// Sends `contents` to the signed upload URL
    ///
    /// # Errors
    ///
    /// [`UploadError::Transfer`] carrying the status of a non-success response
    async fn transfer(
        &self,
        url: &str,
        contents: Bytes,
        media_type: &Mime,
    ) -> Result<(), UploadError>;

    /// Asks the issuer to authorize a download of `key`
    ///
    /// # Errors
    ///
    /// [`UploadError::DownloadUrl`] unless the issuer answers with a `url` and `key`
    async fn request_download_url(&self, key: &str) -> Result<SignedUrlResponse, UploadError>;
}

/// [`TransferBackend`] talking HTTP to the issuer and the object store
pub struct HttpTransferBackend {
    client: Client,
    endpoint: Url,
}

impl HttpTransferBackend {
    /// Backend for the issuer at `config.endpoint`
    #[must_use]
    pub fn new(config: &UploaderConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Backend reusing an existing HTTP client
    #[must_use]
    pub fn with_client(client: Client, config: &UploaderConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }
}

/// Decodes an issuer answer, `None` when it is not a usable signed URL
async fn signed_url(response: reqwest::Response) -> Option<SignedUrlResponse> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%status, "Issuer refused the request");
        return None;
    }

    match response.json::<SignedUrlResponse>().await {
        Ok(signed) if !signed.url.is_empty() && !signed.key.is_empty() => Some(signed),
        Ok(_) => {
            tracing::warn!("Issuer response is missing url or key");
            None
        }
        Err(e) => {
            tracing::warn!("Failed to decode issuer response: {e}");
            None
        }
    }
}

#[async_trait]
impl TransferBackend for HttpTransferBackend {
    #[instrument(skip_all, fields(file_name = %request.file_name))]
    async fn request_upload_url(
        &self,
        request: &UploadUrlRequest,
    ) -> Result<SignedUrlResponse, UploadError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        signed_url(response).await.ok_or(UploadError::UploadUrl)
    }

    #[instrument(skip_all, fields(size = contents.len()))]
    async fn transfer(
        &self,
        url: &str,
        contents: Bytes,
        media_type: &Mime,
    ) -> Result<(), UploadError> {
        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, media_type.as_ref())
            .body(contents)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %error_text, "S3 upload error");
            return Err(UploadError::Transfer { status });
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn request_download_url(&self, key: &str) -> Result<SignedUrlResponse, UploadError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("key", key)])
            .send()
            .await?;

        signed_url(response).await.ok_or(UploadError::DownloadUrl)
    }
}
