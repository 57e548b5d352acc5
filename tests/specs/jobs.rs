// SPDX-License-Identifier: MIT

//! spec.md §8 scenario 5 (log ordering), exercised through the actual
//! `/jobs/{id}/logs` endpoint rather than the store directly.

use crate::support::TestApp;

#[tokio::test]
async fn logs_come_back_sorted_by_seq_within_each_stream_regardless_of_post_order() {
    let app = TestApp::new();
    app.post("/sessions", serde_json::json!({"sessionId": "dev"})).await;

    let (status, body) = app
        .post(
            "/jobs/enqueue",
            serde_json::json!({
                "taskId": "task-1",
                "sessionId": "dev",
                "kind": "shell",
                "params": {},
            }),
        )
        .await;
    assert_eq!(status, axum::http::StatusCode::OK);
    let job_id = body["jobId"].as_str().unwrap().to_string();

    for (stream, seq, line) in [
        ("stdout", 2, "second stdout line"),
        ("stdout", 1, "first stdout line"),
        ("stderr", 1, "only stderr line"),
    ] {
        let (status, _) = app
            .post(
                &format!("/jobs/{job_id}/log"),
                serde_json::json!({"stream": stream, "seq": seq, "line": line}),
            )
            .await;
        assert_eq!(status, axum::http::StatusCode::OK);
    }

    let (status, body) = app.get(&format!("/jobs/{job_id}/logs")).await;
    assert_eq!(status, axum::http::StatusCode::OK);
    let lines = body["lines"].as_array().unwrap();

    let stdout_seqs: Vec<u64> = lines
        .iter()
        .filter(|l| l["stream"] == "stdout")
        .map(|l| l["seq"].as_u64().unwrap())
        .collect();
    let stderr_seqs: Vec<u64> = lines
        .iter()
        .filter(|l| l["stream"] == "stderr")
        .map(|l| l["seq"].as_u64().unwrap())
        .collect();
    assert_eq!(stdout_seqs, vec![1, 2]);
    assert_eq!(stderr_seqs, vec![1]);
}
