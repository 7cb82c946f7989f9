use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query,
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use common_types::{DownloadUrlQuery, SignedUrlResponse, UploadUrlRequest};
use tracing::instrument;

use crate::{
    object_storage::{TransferRequest, UrlSigner},
    types::{AppError, IssuerConfig, RequestError},
};

/// Issues a signed URL for the object named in the request
///
/// * `OPTIONS` answers the CORS preflight with an empty body.
/// * `POST` reads `fileName` from the JSON body and authorizes an upload.
/// * `GET` reads the `key` query parameter and authorizes a download.
///
/// Every other method gets a 405. Any failure while building or signing the
/// request, including a missing or empty key, is logged and answered with a
/// generic 500; the signer is never called without a key.
#[instrument(skip_all, fields(method = %method))]
pub async fn handler(
    method: Method,
    Extension(signer): Extension<Arc<dyn UrlSigner>>,
    Extension(config): Extension<IssuerConfig>,
    query: Result<Query<DownloadUrlQuery>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let request = match method {
        Method::OPTIONS => return Ok(StatusCode::OK.into_response()),
        Method::POST => upload_request(body, &config)?,
        Method::GET => download_request(query, &config)?,
        _ => return Err(AppError::method_not_allowed()),
    };

    let signed = signer
        .presign(&request)
        .await
        .map_err(RequestError::from)?;

    tracing::info!(
        method = %request.method,
        key = %signed.object_key,
        expires_at = %signed.expires_at,
        "Issued signed URL"
    );

    Ok(Json(SignedUrlResponse {
        url: signed.url,
        key: signed.object_key,
        expires_at: Some(signed.expires_at),
    })
    .into_response())
}

fn upload_request(
    body: Result<Bytes, BytesRejection>,
    config: &IssuerConfig,
) -> Result<TransferRequest, RequestError> {
    let body = body.map_err(|e| RequestError::Body(e.body_text()))?;

    // An absent body is treated as an empty document
    let payload: UploadUrlRequest = if body.is_empty() {
        UploadUrlRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    tracing::debug!(
        file_type = ?payload.file_type,
        file_size = ?payload.file_size,
        "Upload authorization requested"
    );

    let key = require_key(Some(payload.file_name))?;
    Ok(TransferRequest::upload(key, config.url_expiry))
}

fn download_request(
    query: Result<Query<DownloadUrlQuery>, QueryRejection>,
    config: &IssuerConfig,
) -> Result<TransferRequest, RequestError> {
    let Query(query) = query.map_err(|e| RequestError::MalformedQuery(e.body_text()))?;

    let key = require_key(query.key)?;
    Ok(TransferRequest::download(key, config.url_expiry))
}

fn require_key(key: Option<String>) -> Result<String, RequestError> {
    key.filter(|k| !k.is_empty()).ok_or(RequestError::MissingKey)
}
