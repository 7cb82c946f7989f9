//! Universal error handling for the API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common_types::ErrorResponse;
use thiserror::Error;

use crate::object_storage::SigningError;

/// Anything that stops a signed-URL request from being served
///
/// None of these details reach the caller; they are logged and collapsed into a
/// generic internal error.
#[derive(Error, Debug)]
pub enum RequestError {
    /// Request body could not be read
    #[error("Failed to read request body: {0}")]
    Body(String),

    /// Request body is not the expected JSON document
    #[error("Malformed JSON body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// Query string could not be decoded
    #[error("Malformed query string: {0}")]
    MalformedQuery(String),

    /// No object key supplied, or an empty one
    #[error("Missing object key")]
    MissingKey,

    /// The object store refused to sign
    #[error(transparent)]
    Signing(#[from] SigningError),
}

/// Application error type rendered as a `{message}` JSON body
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub const fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    /// Generic 500 that hides the cause from the caller
    #[must_use]
    pub const fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
    }

    /// Method outside `OPTIONS`, `POST` and `GET`
    #[must_use]
    pub const fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }

    /// Unknown route
    #[must_use]
    pub const fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found")
    }

    /// Status code of the response
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {} - {}", self.status, self.message),
            500..=599 => tracing::error!("Server error: {} - {}", self.status, self.message),
            _ => {}
        }

        (
            self.status,
            Json(ErrorResponse {
                message: self.message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Request failures are logged in full and surfaced as a bare 500
impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        match &err {
            RequestError::Signing(e) => tracing::error!("Failed to sign URL: {e}"),
            other => tracing::error!("Rejected signed URL request: {other}"),
        }

        Self::internal()
    }
}
