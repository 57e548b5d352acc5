// SPDX-License-Identifier: MIT

//! spec.md §8 scenarios 2 (priority ordering) and 4 (conflicting claim).

use crate::support::TestApp;

async fn enqueue(app: &TestApp, prompt: &str, priority: &str) -> String {
    let (status, body) = app
        .post(
            "/requests/enqueue",
            serde_json::json!({
                "sessionId": "dev",
                "originalPrompt": prompt,
                "enhancedPrompt": prompt,
                "priority": priority,
            }),
        )
        .await;
    assert_eq!(status, axum::http::StatusCode::OK);
    body["requestId"].as_str().unwrap().to_string()
}

async fn claim(app: &TestApp) -> Option<String> {
    let (status, body) = app
        .post("/requests/claim", serde_json::json!({"agentId": "agent-1"}))
        .await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body["ok"], true);
    body["request"]["id"].as_str().map(str::to_string)
}

#[tokio::test]
async fn interactive_requests_jump_the_normal_and_background_queue() {
    let app = TestApp::new();
    app.post("/sessions", serde_json::json!({"sessionId": "dev"})).await;

    let r1 = enqueue(&app, "normal", "normal").await;
    let r2 = enqueue(&app, "background", "background").await;
    let r3 = enqueue(&app, "interactive", "interactive").await;

    assert_eq!(claim(&app).await, Some(r3));
    assert_eq!(claim(&app).await, Some(r1));
    assert_eq!(claim(&app).await, Some(r2));
    assert_eq!(claim(&app).await, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn only_one_of_two_concurrent_claims_wins_a_single_pending_request() {
    let app = TestApp::new();
    app.post("/sessions", serde_json::json!({"sessionId": "dev"})).await;
    enqueue(&app, "only one taker", "normal").await;

    let (first, second) = tokio::join!(claim(&app), claim(&app));
    let winners = [first, second].into_iter().filter(Option::is_some).count();
    assert_eq!(winners, 1, "exactly one of the two concurrent claims should win");
}

#[tokio::test]
async fn complete_and_fail_update_status() {
    let app = TestApp::new();
    app.post("/sessions", serde_json::json!({"sessionId": "dev"})).await;
    let ok_id = enqueue(&app, "succeeds", "normal").await;
    let fail_id = enqueue(&app, "fails", "normal").await;

    let claimed_ok = claim(&app).await.unwrap();
    assert_eq!(claimed_ok, ok_id);
    let (status, body) = app
        .post(&format!("/requests/{ok_id}/complete"), serde_json::json!({"result": {"ok": true}}))
        .await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body["ok"], true);

    let claimed_fail = claim(&app).await.unwrap();
    assert_eq!(claimed_fail, fail_id);
    let (status, body) = app
        .post(&format!("/requests/{fail_id}/fail"), serde_json::json!({"message": "boom"}))
        .await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (_, listing) = app.get("/requests").await;
    let statuses: std::collections::HashMap<_, _> = listing["requests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| (r["id"].as_str().unwrap().to_string(), r["status"].as_str().unwrap().to_string()))
        .collect();
    assert_eq!(statuses[&ok_id], "completed");
    assert_eq!(statuses[&fail_id], "failed");
}
