use super::*;
use pushpals_core::{JobBuilder, QueueItemStatus, RequestBuilder, WorkerRecord, WorkerStatus};
use std::collections::BTreeSet;
use tempfile::tempdir;

fn worker_record(id: &str, last_heartbeat: u64) -> WorkerRecord {
    WorkerRecord {
        worker_id: pushpals_core::WorkerId::new(id),
        status: WorkerStatus::Busy,
        current_job_id: None,
        poll_ms: None,
        capabilities: BTreeSet::new(),
        details: serde_json::Value::Null,
        last_heartbeat_epoch_ms: last_heartbeat,
        created_at_epoch_ms: last_heartbeat,
        updated_at_epoch_ms: last_heartbeat,
    }
}

#[tokio::test]
async fn queue_wait_budget_tick_fails_requests_past_their_budget() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let hub = SessionHub::new(4);

    let request = RequestBuilder::default()
        .enqueued_at_epoch_ms(0)
        .queue_wait_budget_ms(100)
        .build();
    let id = request.id;
    store.enqueue_request(request).unwrap();

    queue_wait_budget_tick(&store, &hub, 200).await;

    assert_eq!(store.get_request(&id).unwrap().status, QueueItemStatus::Failed);
}

#[tokio::test]
async fn queue_wait_budget_tick_leaves_requests_within_budget_alone() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let hub = SessionHub::new(4);

    let request = RequestBuilder::default()
        .enqueued_at_epoch_ms(0)
        .queue_wait_budget_ms(1_000)
        .build();
    let id = request.id;
    store.enqueue_request(request).unwrap();

    queue_wait_budget_tick(&store, &hub, 200).await;

    assert_eq!(store.get_request(&id).unwrap().status, QueueItemStatus::Pending);
}

#[tokio::test]
async fn execution_budget_tick_fails_jobs_past_their_budget() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let hub = SessionHub::new(4);

    let job = JobBuilder::default()
        .enqueued_at_epoch_ms(0)
        .execution_budget_ms(50)
        .build();
    let id = job.id;
    store.enqueue_job(job).unwrap();
    let worker_id = pushpals_core::WorkerId::new("worker-1");
    store.upsert_worker(worker_record("worker-1", 0)).unwrap();
    store.claim_next_job(&worker_id, 0).unwrap();

    execution_budget_tick(&store, &hub, 100).await;
    assert_eq!(store.get_job(&id).unwrap().status, QueueItemStatus::Failed);
}

#[tokio::test]
async fn execution_budget_tick_leaves_jobs_within_budget_alone() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let hub = SessionHub::new(4);

    let job = JobBuilder::default()
        .enqueued_at_epoch_ms(0)
        .execution_budget_ms(1_000)
        .build();
    let id = job.id;
    store.enqueue_job(job).unwrap();
    let worker_id = pushpals_core::WorkerId::new("worker-1");
    store.upsert_worker(worker_record("worker-1", 0)).unwrap();
    store.claim_next_job(&worker_id, 0).unwrap();

    execution_budget_tick(&store, &hub, 100).await;
    assert_eq!(store.get_job(&id).unwrap().status, QueueItemStatus::Claimed);
}

#[tokio::test]
async fn worker_heartbeat_tick_requeues_then_fails_after_max_requeues() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    let hub = SessionHub::new(4);
    let worker_id = pushpals_core::WorkerId::new("worker-1");

    let job = JobBuilder::default().enqueued_at_epoch_ms(0).build();
    let id = job.id;
    store.enqueue_job(job).unwrap();
    store.upsert_worker(worker_record("worker-1", 0)).unwrap();
    store.claim_next_job(&worker_id, 0).unwrap();

    // Worker's heartbeat is stale relative to `now` on every tick below. The
    // job starts unclaimed by this loop's first claim; each subsequent tick
    // requeues it until `requeue_count` reaches `max_requeues`, at which
    // point the next tick fails it instead.
    for _ in 0..4 {
        store.claim_next_job(&worker_id, 0).ok();
        worker_heartbeat_tick(&store, &hub, 10_000, 500, 3).await;
    }

    let job = store.get_job(&id).unwrap();
    assert_eq!(job.status, QueueItemStatus::Failed);
}
