// Not every helper is used in every test binary
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use common_types::{DownloadUrlQuery, SignedUrlResponse, UploadUrlRequest};
use serde_json::json;
use tokio::net::TcpListener;
use uploader::{
    backend::HttpTransferBackend,
    config::UploaderConfig,
    orchestrator::Uploader,
    render::{RenderedResult, Renderer, View},
    validation::SelectedFile,
};
use url::Url;

/// How the fake issuer and object store answer
#[derive(Debug, Clone)]
pub struct Behavior {
    pub upload_url_status: StatusCode,
    pub put_status: StatusCode,
    pub download_url_status: StatusCode,
    /// Answer the upload authorization without a `key`
    pub omit_upload_key: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            upload_url_status: StatusCode::OK,
            put_status: StatusCode::OK,
            download_url_status: StatusCode::OK,
            omit_upload_key: false,
        }
    }
}

/// An object as received by the fake store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub contents: Vec<u8>,
    pub content_type: Option<String>,
}

/// Everything the fake services were asked
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub upload_requests: Vec<UploadUrlRequest>,
    pub download_keys: Vec<String>,
    pub put_keys: Vec<String>,
    pub objects: HashMap<String, StoredObject>,
}

struct FakeState {
    base_url: String,
    behavior: Behavior,
    recorded: Mutex<Recorded>,
}

/// Fake issuer (`/`) and object store (`/storage/{key}`) on a local port
pub struct FakeCloud {
    pub base_url: Url,
    state: Arc<FakeState>,
}

impl FakeCloud {
    pub async fn start(behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let state = Arc::new(FakeState {
            base_url: base_url.clone(),
            behavior,
            recorded: Mutex::new(Recorded::default()),
        });

        let router = Router::new()
            .route("/", get(issue_download_url).post(issue_upload_url))
            .merge(storage_routes())
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: base_url.parse().unwrap(),
            state,
        }
    }

    /// Object store only; URLs are expected at `{base_url}/storage/{key}`
    pub async fn start_storage() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let state = Arc::new(FakeState {
            base_url: base_url.clone(),
            behavior: Behavior::default(),
            recorded: Mutex::new(Recorded::default()),
        });

        let router = storage_routes().with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: base_url.parse().unwrap(),
            state,
        }
    }

    pub fn recorded(&self) -> Recorded {
        self.state.recorded.lock().unwrap().clone()
    }
}

fn storage_routes() -> Router<Arc<FakeState>> {
    Router::new().route("/storage/{key}", put(store_object).get(fetch_object))
}

async fn issue_upload_url(
    State(state): State<Arc<FakeState>>,
    Json(request): Json<UploadUrlRequest>,
) -> Response {
    state
        .recorded
        .lock()
        .unwrap()
        .upload_requests
        .push(request.clone());

    if state.behavior.upload_url_status != StatusCode::OK {
        return state.behavior.upload_url_status.into_response();
    }

    let url = format!("{}/storage/{}?op=put", state.base_url, request.file_name);
    if state.behavior.omit_upload_key {
        return Json(json!({ "url": url })).into_response();
    }

    Json(SignedUrlResponse {
        url,
        key: request.file_name,
        expires_at: None,
    })
    .into_response()
}

async fn issue_download_url(
    State(state): State<Arc<FakeState>>,
    Query(query): Query<DownloadUrlQuery>,
) -> Response {
    let key = query.key.unwrap_or_default();
    state
        .recorded
        .lock()
        .unwrap()
        .download_keys
        .push(key.clone());

    if state.behavior.download_url_status != StatusCode::OK {
        return state.behavior.download_url_status.into_response();
    }

    Json(SignedUrlResponse {
        url: format!("{}/storage/{key}?op=get", state.base_url),
        key,
        expires_at: None,
    })
    .into_response()
}

async fn store_object(
    State(state): State<Arc<FakeState>>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut recorded = state.recorded.lock().unwrap();
    recorded.put_keys.push(key.clone());

    if state.behavior.put_status != StatusCode::OK {
        return (state.behavior.put_status, "<Error><Code>AccessDenied</Code></Error>")
            .into_response();
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    recorded.objects.insert(
        key,
        StoredObject {
            contents: body.to_vec(),
            content_type,
        },
    );

    StatusCode::OK.into_response()
}

async fn fetch_object(State(state): State<Arc<FakeState>>, Path(key): Path<String>) -> Response {
    let recorded = state.recorded.lock().unwrap();
    match recorded.objects.get(&key) {
        Some(object) => object.contents.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Renderer that keeps every view it was given
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub views: Vec<View>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: View) {
        self.views.push(view);
    }
}

impl RecordingRenderer {
    pub fn progress(&self) -> Vec<u8> {
        self.views
            .iter()
            .filter_map(|view| match view {
                View::Progress(checkpoint) => Some(checkpoint.percent()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.views
            .iter()
            .filter_map(|view| match view {
                View::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn results(&self) -> Vec<RenderedResult> {
        self.views
            .iter()
            .filter_map(|view| match view {
                View::Result(result) => Some(result.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn preview_count(&self) -> usize {
        self.views
            .iter()
            .filter(|view| matches!(view, View::Preview(_)))
            .count()
    }
}

pub type TestUploader = Uploader<HttpTransferBackend, RecordingRenderer>;

/// Uploader pointed at `endpoint`
pub fn uploader_for(endpoint: Url) -> TestUploader {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();

    let config = UploaderConfig::new(endpoint);
    Uploader::new(
        &config,
        HttpTransferBackend::new(&config),
        RecordingRenderer::default(),
    )
}

/// A 2 MB JPEG
pub fn photo() -> SelectedFile {
    SelectedFile::new("photo.jpg", mime::IMAGE_JPEG, vec![0xAB; 2_000_000])
}
