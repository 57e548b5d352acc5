use super::*;
use pushpals_core::{WorkerId, WorkerRecord, WorkerStatus};
use std::collections::BTreeSet;

fn heartbeat(id: WorkerId, status: WorkerStatus, at: u64) -> WorkerRecord {
    WorkerRecord {
        worker_id: id,
        status,
        current_job_id: None,
        poll_ms: Some(1000),
        capabilities: BTreeSet::new(),
        details: serde_json::Value::Null,
        last_heartbeat_epoch_ms: at,
        created_at_epoch_ms: at,
        updated_at_epoch_ms: at,
    }
}

#[test]
fn first_heartbeat_inserts_worker() {
    let mut state = MaterializedState::default();
    let id = WorkerId::new("worker-1");
    apply(
        &mut state,
        &StoreOp::UpsertWorker {
            record: Box::new(heartbeat(id.clone(), WorkerStatus::Idle, 10)),
        },
    )
    .unwrap();
    assert_eq!(state.workers.get(&id).unwrap().status, WorkerStatus::Idle);
}

#[test]
fn later_heartbeat_overwrites_status_but_keeps_created_at() {
    let mut state = MaterializedState::default();
    let id = WorkerId::new("worker-1");
    apply(
        &mut state,
        &StoreOp::UpsertWorker {
            record: Box::new(heartbeat(id.clone(), WorkerStatus::Idle, 10)),
        },
    )
    .unwrap();
    apply(
        &mut state,
        &StoreOp::UpsertWorker {
            record: Box::new(heartbeat(id.clone(), WorkerStatus::Busy, 20)),
        },
    )
    .unwrap();
    let row = state.workers.get(&id).unwrap();
    assert_eq!(row.status, WorkerStatus::Busy);
    assert_eq!(row.created_at_epoch_ms, 10);
    assert_eq!(row.last_heartbeat_epoch_ms, 20);
}

#[test]
fn out_of_order_replay_does_not_regress_state() {
    let mut state = MaterializedState::default();
    let id = WorkerId::new("worker-1");
    apply(
        &mut state,
        &StoreOp::UpsertWorker {
            record: Box::new(heartbeat(id.clone(), WorkerStatus::Busy, 20)),
        },
    )
    .unwrap();
    apply(
        &mut state,
        &StoreOp::UpsertWorker {
            record: Box::new(heartbeat(id.clone(), WorkerStatus::Idle, 10)),
        },
    )
    .unwrap();
    assert_eq!(state.workers.get(&id).unwrap().status, WorkerStatus::Busy);
}
