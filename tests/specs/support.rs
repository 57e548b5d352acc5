// SPDX-License-Identifier: MIT

//! Shared scaffolding for the scenario tests: a router over a fresh store,
//! plus thin JSON request helpers (grounded on `adamtc007-ob-poc`'s
//! `sem_os_server/tests/authoring_http_integration.rs`, which builds the
//! same shape of `build_test_app()` + `body_json()` pair).

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pushpals_server::config::PushPalsConfig;
use pushpals_server::session_hub::SessionHub;
use pushpals_server::transport::{build_router, AppState};
use pushpals_server::watchdogs;
use pushpals_storage::Store;
use tempfile::TempDir;
use tower::ServiceExt;

/// A router over a fresh, empty store. Holds the backing tempdir so it
/// outlives every request made against it.
pub struct TestApp {
    router: axum::Router,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(PushPalsConfig::default())
    }

    pub fn with_config(mut config: PushPalsConfig) -> Self {
        let dir = tempfile::tempdir().unwrap();
        config.state_dir = dir.path().to_path_buf();
        let store = Arc::new(Store::open(&config.state_dir).unwrap());
        let hub = SessionHub::new(config.subscriber_buffer);
        watchdogs::spawn_all(store.clone(), hub.clone(), &config);
        let config = Arc::new(config);
        let state = AppState::new(store, hub, config);
        Self {
            router: build_router(state),
            _dir: dir,
        }
    }

    pub async fn post(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.call("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.call("PUT", uri, Some(body)).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.call("GET", uri, None).await
    }

    /// Escape hatch for requests `post`/`put`/`get` can't shape (streaming
    /// responses, non-JSON bodies, raw status assertions).
    pub fn router(&self) -> axum::Router {
        self.router.clone()
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(value) => Body::from(value.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

/// Drain an SSE response for a bounded window rather than to completion —
/// the stream only ends when the client disconnects, so collecting it in
/// full would hang on the 15s keep-alive.
pub async fn read_sse_text(response: axum::response::Response, window: std::time::Duration) -> String {
    let mut body = response.into_body();
    let mut buf = Vec::new();
    let deadline = tokio::time::Instant::now() + window;
    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            break;
        }
        match tokio::time::timeout(remaining, body.frame()).await {
            Ok(Some(Ok(frame))) => {
                if let Some(data) = frame.data_ref() {
                    buf.extend_from_slice(data);
                }
            }
            _ => break,
        }
    }
    String::from_utf8(buf).unwrap()
}
