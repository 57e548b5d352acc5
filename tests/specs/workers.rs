// SPDX-License-Identifier: MIT

//! spec.md §8 scenario 6 (worker lost): claim a job, stop heartbeating,
//! and watch the heartbeat watchdog requeue it up to the configured limit
//! before failing it with `worker-lost`.

use std::time::Duration;

use pushpals_server::config::PushPalsConfig;

use crate::support::TestApp;

#[tokio::test]
async fn an_abandoned_job_is_requeued_then_failed_as_worker_lost() {
    let mut config = PushPalsConfig::default();
    config.watchdog_tick_ms = 20;
    config.heartbeat_ttl_ms = 30;
    config.worker_lost_max_requeues = 1;
    let app = TestApp::with_config(config);

    app.post("/sessions", serde_json::json!({"sessionId": "dev"})).await;
    let (_, body) = app
        .post(
            "/jobs/enqueue",
            serde_json::json!({"taskId": "task-1", "sessionId": "dev", "kind": "shell", "params": {}}),
        )
        .await;
    let job_id = body["jobId"].as_str().unwrap().to_string();

    app.put(
        "/workers/heartbeat",
        serde_json::json!({"workerId": "worker-1", "status": "idle"}),
    )
    .await;
    let (_, body) = app.post("/jobs/claim", serde_json::json!({"workerId": "worker-1"})).await;
    assert_eq!(body["job"]["id"], job_id);

    // No further heartbeats: once the worker goes stale, the watchdog
    // requeues the job (back to `pending`, `requeueCount` 1) rather than
    // failing it outright — it only fails a job already at its requeue
    // budget when it next sees it still `claimed`.
    tokio::time::sleep(Duration::from_millis(120)).await;
    let job = find_job(&app, &job_id).await;
    assert_eq!(job["status"], "pending");
    assert_eq!(job["requeueCount"], 1);

    // Reclaim it under the same lost worker and let the watchdog catch it
    // a second time: `requeueCount` (1) is already at `workerLostMaxRequeues`
    // (1), so this pass fails the job instead of requeuing it again.
    let (_, body) = app.post("/jobs/claim", serde_json::json!({"workerId": "worker-1"})).await;
    assert_eq!(body["job"]["id"], job_id);
    tokio::time::sleep(Duration::from_millis(120)).await;

    let job = find_job(&app, &job_id).await;
    assert_eq!(job["status"], "failed");
    assert_eq!(job["error"]["message"], "worker-lost");
}

async fn find_job(app: &TestApp, job_id: &str) -> serde_json::Value {
    let (_, listing) = app.get("/jobs").await;
    listing["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .find(|j| j["id"] == job_id)
        .unwrap()
        .clone()
}
