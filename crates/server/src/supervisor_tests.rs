use super::*;
use pushpals_core::{RequestBuilder, WorkerRecord, WorkerStatus};
use std::collections::BTreeSet;
use tempfile::tempdir;

fn worker_record(id: &str, last_heartbeat: u64) -> WorkerRecord {
    WorkerRecord {
        worker_id: WorkerId::new(id),
        status: WorkerStatus::Idle,
        current_job_id: None,
        poll_ms: None,
        capabilities: BTreeSet::new(),
        details: serde_json::Value::Null,
        last_heartbeat_epoch_ms: last_heartbeat,
        created_at_epoch_ms: last_heartbeat,
        updated_at_epoch_ms: last_heartbeat,
    }
}

#[test]
fn list_requests_reflects_store_contents() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    store
        .enqueue_request(RequestBuilder::default().enqueued_at_epoch_ms(1).build())
        .unwrap();
    assert_eq!(list_requests(&store).requests.len(), 1);
}

#[test]
fn worker_summaries_report_presence_from_heartbeat_age() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    store.upsert_worker(worker_record("worker-1", 0)).unwrap();

    let summaries = list_worker_summaries(&store, 1_000, 500);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].presence, pushpals_core::WorkerPresence::Offline);

    let summaries = list_worker_summaries(&store, 100, 500);
    assert_eq!(summaries[0].presence, pushpals_core::WorkerPresence::Online);
}

#[test]
fn system_status_reports_zeroed_rollups_with_no_activity() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let status = system_status(&store, 0, 1_000);
    assert!(status.workers.is_empty());
    assert_eq!(status.requests.sample_count, 0);
}
