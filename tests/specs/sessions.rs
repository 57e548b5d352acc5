// SPDX-License-Identifier: MIT

//! spec.md §8 scenarios 1 (session idempotency) and 3 (resume with cursor).

use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use tower::ServiceExt;

use crate::support::{read_sse_text, TestApp};

#[tokio::test]
async fn creating_a_session_twice_is_idempotent() {
    let app = TestApp::new();

    let (status, first) = app.post("/sessions", serde_json::json!({"sessionId": "dev"})).await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(first["sessionId"], "dev");
    assert_eq!(first["created"], true);

    let (status, second) = app.post("/sessions", serde_json::json!({"sessionId": "dev"})).await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(second["sessionId"], "dev");
    assert_eq!(second["created"], false);
}

#[tokio::test]
async fn resuming_with_a_cursor_only_returns_events_after_it() {
    let app = TestApp::new();
    app.post("/sessions", serde_json::json!({"sessionId": "dev"})).await;

    for i in 1..=5 {
        let (status, _) = app
            .post(
                "/sessions/dev/command",
                serde_json::json!({"from": "tester", "type": "message", "payload": {"text": format!("line {i}")}}),
            )
            .await;
        assert_eq!(status, axum::http::StatusCode::OK);
    }

    let request = Request::builder()
        .uri("/sessions/dev/events?after=3")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let text = read_sse_text(response, Duration::from_millis(300)).await;
    for cursor in [4, 5] {
        assert!(text.contains(&format!("id: {cursor}")), "missing cursor {cursor} in:\n{text}");
    }
    for cursor in [1, 2, 3] {
        assert!(!text.contains(&format!("id: {cursor}\n")), "unexpected cursor {cursor} in:\n{text}");
    }
}
