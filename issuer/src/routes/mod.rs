mod health;
pub mod presign;

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};

use crate::types::AppError;

/// Creates the router with all handler routes
pub fn handler() -> Router {
    Router::new()
        .route("/", any(presign::handler))
        .route("/health", get(health::handler))
        // Applies to the routes above, keep it after them
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
}

/// Known path, method without a handler
async fn method_not_allowed(method: Method) -> Response {
    preflight_or(&method, AppError::method_not_allowed())
}

/// Unknown path
async fn not_found(method: Method) -> Response {
    preflight_or(&method, AppError::not_found())
}

/// Preflight requests are answered on every path
fn preflight_or(method: &Method, error: AppError) -> Response {
    if *method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        error.into_response()
    }
}
