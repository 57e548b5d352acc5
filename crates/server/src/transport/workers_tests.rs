use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use pushpals_core::{WorkerId, WorkerPresence, WorkerStatus};
use pushpals_storage::Store;
use pushpals_wire::workers::{HeartbeatBody, ListWorkersQuery};
use tempfile::tempdir;

use super::*;
use crate::config::PushPalsConfig;
use crate::session_hub::SessionHub;

fn state_with(store: Arc<Store>) -> AppState {
    AppState::new(store, SessionHub::new(4), Arc::new(PushPalsConfig::default()))
}

fn heartbeat_body(id: &str) -> HeartbeatBody {
    HeartbeatBody {
        worker_id: WorkerId::new(id),
        status: WorkerStatus::Idle,
        current_job_id: None,
        poll_ms: Some(1_000),
        capabilities: BTreeSet::new(),
        details: serde_json::Value::Null,
    }
}

#[tokio::test]
async fn heartbeat_then_list_reports_the_worker_online() {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path()).unwrap());
    let state = state_with(store);

    let response = heartbeat(State(state.clone()), Json(heartbeat_body("worker-1"))).await.unwrap();
    assert!(response.ok);

    let listed = list(State(state.clone()), Query(ListWorkersQuery { ttl_ms: None })).await;
    assert_eq!(listed.workers.len(), 1);
    assert_eq!(listed.workers[0].presence, WorkerPresence::Online);
    assert_eq!(listed.workers[0].status, WorkerStatus::Idle);
}

#[tokio::test]
async fn repeated_heartbeats_preserve_the_original_created_at() {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path()).unwrap());
    let state = state_with(store);

    heartbeat(State(state.clone()), Json(heartbeat_body("worker-1"))).await.unwrap();
    let first = state.store.get_worker(&WorkerId::new("worker-1")).unwrap();

    heartbeat(State(state.clone()), Json(heartbeat_body("worker-1"))).await.unwrap();
    let second = state.store.get_worker(&WorkerId::new("worker-1")).unwrap();

    assert_eq!(first.created_at_epoch_ms, second.created_at_epoch_ms);
}

#[tokio::test]
async fn a_small_ttl_override_reports_the_worker_offline() {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path()).unwrap());
    let state = state_with(store);

    heartbeat(State(state.clone()), Json(heartbeat_body("worker-1"))).await.unwrap();
    let listed = list(State(state.clone()), Query(ListWorkersQuery { ttl_ms: Some(0) })).await;
    assert_eq!(listed.workers[0].presence, WorkerPresence::Offline);
}
