use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use pushpals_core::{QueueItemStatus, WorkerId, WorkerRecord, WorkerStatus};
use pushpals_storage::Store;
use pushpals_wire::jobs::{ClaimJobBody, EnqueueJobBody, JobCompleteBody, JobFailBody, JobLogBody, JobLogsQuery};
use tempfile::tempdir;

use super::*;
use crate::config::PushPalsConfig;
use crate::session_hub::SessionHub;

fn state_with(store: Arc<Store>) -> AppState {
    AppState::new(store, SessionHub::new(4), Arc::new(PushPalsConfig::default()))
}

fn enqueue_body() -> EnqueueJobBody {
    EnqueueJobBody {
        task_id: "task-1".to_string(),
        session_id: "session-1".to_string(),
        kind: "push".to_string(),
        params: serde_json::Value::Null,
        target_worker_id: None,
        priority: 0,
        execution_budget_ms: None,
        finalization_budget_ms: None,
        idempotency_key: None,
    }
}

fn idle_worker(id: &str) -> WorkerRecord {
    WorkerRecord {
        worker_id: WorkerId::new(id),
        status: WorkerStatus::Idle,
        current_job_id: None,
        poll_ms: None,
        capabilities: BTreeSet::new(),
        details: serde_json::Value::Null,
        last_heartbeat_epoch_ms: 0,
        created_at_epoch_ms: 0,
        updated_at_epoch_ms: 0,
    }
}

#[tokio::test]
async fn enqueue_then_claim_round_trips() {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path()).unwrap());
    store.upsert_worker(idle_worker("worker-1")).unwrap();
    let state = state_with(store);

    let response = enqueue(State(state.clone()), Json(enqueue_body())).await.unwrap();
    assert!(response.ok);

    let claimed = claim(
        State(state.clone()),
        Json(ClaimJobBody {
            worker_id: WorkerId::new("worker-1"),
        }),
    )
    .await
    .unwrap();
    let job = claimed.job.clone().expect("job should be claimable");
    assert_eq!(job.id, response.job_id);
    assert_eq!(job.status, QueueItemStatus::Claimed);
}

#[tokio::test]
async fn complete_and_fail_update_status() {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path()).unwrap());
    let state = state_with(store);

    let response = enqueue(State(state.clone()), Json(enqueue_body())).await.unwrap();
    let id = response.job_id;
    complete(State(state.clone()), Path(id.to_string()), Json(JobCompleteBody { result: None }))
        .await
        .unwrap();
    assert_eq!(state.store.get_job(&id).unwrap().status, QueueItemStatus::Completed);

    let other = enqueue(State(state.clone()), Json(enqueue_body())).await.unwrap();
    fail(
        State(state.clone()),
        Path(other.job_id.to_string()),
        Json(JobFailBody {
            message: "boom".to_string(),
            detail: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(
        state.store.get_job(&other.job_id).unwrap().status,
        QueueItemStatus::Failed
    );
}

/// spec.md §8 scenario 5: posting (seq=2, stdout), (seq=1, stdout), (seq=1,
/// stderr) must come back with stdout sorted [1, 2] and stderr [1].
#[tokio::test]
async fn logs_are_sorted_by_seq_within_each_stream() {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path()).unwrap());
    let state = state_with(store);

    let response = enqueue(State(state.clone()), Json(enqueue_body())).await.unwrap();
    let id = response.job_id;

    for (stream, seq, line) in [
        (LogStream::Stdout, 2, "second"),
        (LogStream::Stdout, 1, "first"),
        (LogStream::Stderr, 1, "only"),
    ] {
        log(
            State(state.clone()),
            Path(id.to_string()),
            Json(JobLogBody {
                stream,
                seq,
                line: line.to_string(),
            }),
        )
        .await
        .unwrap();
    }

    let response = logs(State(state.clone()), Path(id.to_string()), Query(JobLogsQuery { limit: None })).await;

    let stdout_seqs: Vec<u64> = response
        .lines
        .iter()
        .filter(|l| l.stream == LogStream::Stdout)
        .map(|l| l.seq)
        .collect();
    let stderr_seqs: Vec<u64> = response
        .lines
        .iter()
        .filter(|l| l.stream == LogStream::Stderr)
        .map(|l| l.seq)
        .collect();
    assert_eq!(stdout_seqs, vec![1, 2]);
    assert_eq!(stderr_seqs, vec![1]);
}
