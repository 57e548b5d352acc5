// SPDX-License-Identifier: MIT

//! Job: a planned unit of work claimable by a worker.
//!
//! A job belongs to exactly one task; a task is a logical grouping only
//! (no row) reconstructed from the event stream, never materialized as a
//! pointer (spec.md §3, §9 "Cyclic task↔job↔event relationships").

use crate::priority::Priority;
use crate::queue_item::QueueItemStatus;
use crate::session::SessionId;
use crate::worker::WorkerId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier for a job row.
    pub struct JobId("job-");
}

/// A job claimable by a [`crate::worker::WorkerId`].
///
/// Lifecycle: `pending -> claimed -> (completed | failed)`; terminal
/// states are sticky. `target_worker_id` is a soft hint, not a hard
/// binding: any online worker may claim an unbound job (spec.md §4.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    /// Logical grouping key, not a stored row — see module docs.
    pub task_id: String,
    pub session_id: SessionId,
    pub kind: String,
    pub params: serde_json::Value,
    /// Caller-supplied dedup key, symmetric with [`crate::request::Request`]
    /// (spec.md §3).
    pub idempotency_key: Option<String>,
    pub priority: Priority,
    pub status: QueueItemStatus,
    pub worker_id: Option<WorkerId>,
    pub target_worker_id: Option<WorkerId>,
    pub result: Option<serde_json::Value>,
    pub error: Option<serde_json::Value>,
    pub execution_budget_ms: Option<u64>,
    pub finalization_budget_ms: Option<u64>,
    /// Incremented each time the worker-lost watchdog requeues this job;
    /// once it exceeds the configured ceiling the job is failed with
    /// `worker-lost` instead of requeued again (spec.md §4.4, §8 scenario 6).
    pub requeue_count: u32,
    pub enqueued_at_epoch_ms: u64,
    pub claimed_at_epoch_ms: Option<u64>,
    pub started_at_epoch_ms: Option<u64>,
    pub first_log_at_epoch_ms: Option<u64>,
    pub completed_at_epoch_ms: Option<u64>,
    pub failed_at_epoch_ms: Option<u64>,
    pub updated_at_epoch_ms: u64,
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct JobBuilder => Job {
        set { id: JobId = JobId::new() }
        into { task_id: String = "task-1" }
        into { session_id: SessionId = "test-session" }
        into { kind: String = "build" }
        set { params: serde_json::Value = serde_json::Value::Null }
        option { idempotency_key: String = None }
        set { priority: Priority = Priority::Normal }
        set { status: QueueItemStatus = QueueItemStatus::Pending }
        option { worker_id: WorkerId = None }
        option { target_worker_id: WorkerId = None }
        option { result: serde_json::Value = None }
        option { error: serde_json::Value = None }
        option { execution_budget_ms: u64 = None }
        option { finalization_budget_ms: u64 = None }
        set { requeue_count: u32 = 0 }
        set { enqueued_at_epoch_ms: u64 = 0 }
        option { claimed_at_epoch_ms: u64 = None }
        option { started_at_epoch_ms: u64 = None }
        option { first_log_at_epoch_ms: u64 = None }
        option { completed_at_epoch_ms: u64 = None }
        option { failed_at_epoch_ms: u64 = None }
        set { updated_at_epoch_ms: u64 = 0 }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
