//! Wire types shared by the signed-URL issuer and the upload client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifetime of every signed URL handed out by the issuer, in seconds
pub const SIGNED_URL_EXPIRY_SECS: u64 = 600;

/// Operation a signed URL authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferMethod {
    /// Write the object (`PUT`)
    Upload,
    /// Read the object (`GET`)
    Download,
}

/// Body of the `POST` request asking for an upload URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    /// Object key to authorize; the client sends the plain file name
    #[serde(default)]
    pub file_name: String,
    /// Media type of the file, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    /// Size of the file in bytes, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

/// Query string of the `GET` request asking for a download URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadUrlQuery {
    /// Object key to authorize
    pub key: Option<String>,
}

/// Successful issuer response for both upload and download authorizations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlResponse {
    /// Presigned URL
    pub url: String,
    /// Object key the URL is bound to
    pub key: String,
    /// When the URL stops being accepted by the object store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Error body returned by the issuer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message, never carries internal details
    pub message: String,
}
