// SPDX-License-Identifier: MIT

//! Session Supervisor: read-only observability over the store. Every
//! function here takes a snapshot via one `Store` call and renders from it
//! — never holding a write lock while rendering (spec.md §4.7), mirroring
//! the daemon's `MetricsHealth` aggregate
//! (`crates/daemon/src/listener/mod.rs`) generalized across all three
//! queues.

use pushpals_core::WorkerId;
use pushpals_storage::{QueueMetricsSnapshot, Store};
use pushpals_wire::system::{
    ListCompletionsResponse, ListJobsResponse, ListRequestsResponse, QueueRollup,
    SystemStatusResponse,
};
use pushpals_wire::workers::WorkerSummary;

fn to_rollup(snapshot: QueueMetricsSnapshot) -> QueueRollup {
    QueueRollup {
        sample_count: snapshot.sample_count,
        queue_wait_p50_ms: snapshot.queue_wait_p50_ms,
        queue_wait_p95_ms: snapshot.queue_wait_p95_ms,
        duration_p50_ms: snapshot.duration_p50_ms,
        duration_p95_ms: snapshot.duration_p95_ms,
        success_rate: snapshot.success_rate,
        timeout_rate: snapshot.timeout_rate,
    }
}

pub fn list_requests(store: &Store) -> ListRequestsResponse {
    ListRequestsResponse {
        requests: store.list_requests(),
    }
}

pub fn list_jobs(store: &Store) -> ListJobsResponse {
    ListJobsResponse {
        jobs: store.list_jobs(),
    }
}

pub fn list_completions(store: &Store) -> ListCompletionsResponse {
    ListCompletionsResponse {
        completions: store.list_completions(),
    }
}

/// `worker_summary`'s presence/idle/busy derivation (spec.md §4.4): never
/// stored, always computed against the caller-supplied `now`/`ttl`.
fn worker_summary(store: &Store, worker_id: &WorkerId, now: u64, ttl_ms: u64) -> Option<WorkerSummary> {
    let record = store.get_worker(worker_id)?;
    Some(WorkerSummary {
        worker_id: record.worker_id.clone(),
        status: record.status,
        presence: record.presence(now, ttl_ms),
        active_job_count: store.active_job_count(worker_id),
        last_heartbeat_epoch_ms: record.last_heartbeat_epoch_ms,
    })
}

pub fn list_worker_summaries(store: &Store, now: u64, ttl_ms: u64) -> Vec<WorkerSummary> {
    store
        .list_workers()
        .into_iter()
        .filter_map(|record| worker_summary(store, &record.worker_id, now, ttl_ms))
        .collect()
}

pub fn system_status(store: &Store, now: u64, ttl_ms: u64) -> SystemStatusResponse {
    SystemStatusResponse {
        workers: list_worker_summaries(store, now, ttl_ms),
        requests: to_rollup(store.request_metrics_snapshot()),
        jobs: to_rollup(store.job_metrics_snapshot()),
        completions: to_rollup(store.completion_metrics_snapshot()),
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
