// Not every helper is used in every test binary
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use chrono::Utc;
use common_types::TransferMethod;
use http_body_util::BodyExt;
use issuer::{
    object_storage::{SignedUrl, SigningError, SigningResult, TransferRequest, UrlSigner},
    server,
    types::IssuerConfig,
};
use tower::ServiceExt;

pub const TEST_BUCKET: &str = "test-bucket";

/// Signer double that records every request it is asked to sign
#[derive(Default)]
pub struct RecordingSigner {
    requests: Mutex<Vec<TransferRequest>>,
    fail_with: Option<String>,
}

impl RecordingSigner {
    pub fn failing(reason: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail_with: Some(reason.to_string()),
        }
    }

    pub fn requests(&self) -> Vec<TransferRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl UrlSigner for RecordingSigner {
    async fn presign(&self, request: &TransferRequest) -> SigningResult<SignedUrl> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(reason) = &self.fail_with {
            return Err(SigningError::PresignError(reason.clone()));
        }

        let operation = match request.method {
            TransferMethod::Upload => "PutObject",
            TransferMethod::Download => "GetObject",
        };

        Ok(SignedUrl {
            url: format!(
                "https://{TEST_BUCKET}.s3.amazonaws.com/{}?x-id={operation}&X-Amz-Expires={}",
                request.object_key,
                request.expiry.as_secs()
            ),
            object_key: request.object_key.clone(),
            expires_at: Utc::now() + request.expiry,
        })
    }
}

/// Router wired to a [`RecordingSigner`]
pub struct TestSetup {
    pub router: Router,
    pub signer: Arc<RecordingSigner>,
}

impl TestSetup {
    pub fn new() -> Self {
        Self::with_signer(RecordingSigner::default())
    }

    pub fn with_signer(signer: RecordingSigner) -> Self {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();

        let signer = Arc::new(signer);
        let router = server::router(signer.clone(), IssuerConfig::new(TEST_BUCKET, "us-east-1"));

        Self { router, signer }
    }

    pub async fn send_request(
        &self,
        method: &str,
        uri: &str,
        body: Option<&str>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let mut builder = Request::builder().uri(uri).method(method);
        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }

        let request = builder.body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_request("POST", route, Some(&payload.to_string()))
            .await
    }
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Raw response body bytes
pub async fn response_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Asserts the three CORS headers every response must carry
pub fn assert_cors_headers(response: &Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert_eq!(headers["access-control-allow-methods"], "GET,POST,OPTIONS");
}
