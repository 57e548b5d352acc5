// SPDX-License-Identifier: MIT

//! Materialized state rebuilt by replaying [`StoreOp`]s, one file per
//! concern (mirrors the daemon's `storage/state/{agents, decisions, jobs,
//! queues, sessions, workers}.rs` split — here: `sessions`, `events`,
//! `requests`, `jobs`, `completions`, `workers`, `logs`).

mod completions;
mod events;
mod jobs;
mod logs;
mod requests;
mod sessions;
mod workers;

use std::collections::HashMap;

use pushpals_core::{
    Completion, CompletionId, Event, Job, JobId, LogLine, Priority, QueueItemStatus, Request,
    RequestId, Session, SessionId, WorkerId, WorkerRecord,
};
use serde::{Deserialize, Serialize};

use crate::metrics::QueueMetrics;
use crate::pending_index::PendingIndex;
use crate::StoreError;

/// A single durable mutation. Handlers never mutate `MaterializedState`
/// fields directly; every change is expressed as one of these variants and
/// applied by the matching sub-state's pure `apply()` (spec.md §4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreOp {
    CreateSession {
        id: SessionId,
        at_epoch_ms: u64,
    },
    TouchSession {
        id: SessionId,
        at_epoch_ms: u64,
    },
    AppendEvent {
        envelope: Box<Event>,
        cursor: u64,
    },
    EnqueueRequest {
        request: Box<Request>,
    },
    ClaimRequest {
        id: RequestId,
        agent_id: String,
        at_epoch_ms: u64,
    },
    CompleteRequest {
        id: RequestId,
        result: serde_json::Value,
        at_epoch_ms: u64,
    },
    FailRequest {
        id: RequestId,
        message: String,
        detail: Option<serde_json::Value>,
        at_epoch_ms: u64,
    },
    EnqueueJob {
        job: Box<Job>,
    },
    ClaimJob {
        id: JobId,
        worker_id: WorkerId,
        at_epoch_ms: u64,
    },
    RequeueJob {
        id: JobId,
        at_epoch_ms: u64,
    },
    CompleteJob {
        id: JobId,
        result: Option<serde_json::Value>,
        at_epoch_ms: u64,
    },
    FailJob {
        id: JobId,
        message: String,
        detail: Option<serde_json::Value>,
        at_epoch_ms: u64,
    },
    AppendJobLog {
        line: Box<LogLine>,
    },
    EnqueueCompletion {
        completion: Box<Completion>,
    },
    ClaimCompletion {
        id: CompletionId,
        pusher_id: String,
        at_epoch_ms: u64,
    },
    CompleteCompletion {
        id: CompletionId,
        at_epoch_ms: u64,
    },
    FailCompletion {
        id: CompletionId,
        message: String,
        detail: Option<serde_json::Value>,
        at_epoch_ms: u64,
    },
    UpsertWorker {
        record: Box<WorkerRecord>,
    },
}

/// Everything rebuilt from the WAL plus the latest snapshot.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MaterializedState {
    pub sessions: HashMap<SessionId, Session>,
    pub events: HashMap<SessionId, Vec<pushpals_core::PositionedEvent>>,
    #[serde(default)]
    pub event_cursors: HashMap<SessionId, u64>,

    pub requests: HashMap<RequestId, Request>,
    #[serde(skip)]
    pub requests_pending: PendingIndex<RequestId>,
    #[serde(default)]
    pub request_idempotency: HashMap<String, RequestId>,

    pub jobs: HashMap<JobId, Job>,
    #[serde(skip)]
    pub jobs_pending: PendingIndex<JobId>,
    #[serde(default)]
    pub job_idempotency: HashMap<String, JobId>,

    pub completions: HashMap<CompletionId, Completion>,
    #[serde(skip)]
    pub completions_pending: PendingIndex<CompletionId>,
    #[serde(default)]
    pub completion_idempotency: HashMap<String, CompletionId>,

    pub workers: HashMap<WorkerId, WorkerRecord>,

    pub logs: HashMap<JobId, Vec<LogLine>>,

    #[serde(default)]
    pub request_metrics: QueueMetrics,
    #[serde(default)]
    pub job_metrics: QueueMetrics,
    #[serde(default)]
    pub completion_metrics: QueueMetrics,
}

impl MaterializedState {
    /// Apply one durable mutation, routing to its owning sub-state. Every
    /// handler is idempotent: replaying the same op twice (WAL replay after
    /// a crash mid-flush) must leave state identical to applying it once.
    pub fn apply(&mut self, op: &StoreOp) -> Result<(), StoreError> {
        match op {
            StoreOp::CreateSession { .. } | StoreOp::TouchSession { .. } => {
                sessions::apply(self, op)
            }
            StoreOp::AppendEvent { .. } => events::apply(self, op),
            StoreOp::EnqueueRequest { .. }
            | StoreOp::ClaimRequest { .. }
            | StoreOp::CompleteRequest { .. }
            | StoreOp::FailRequest { .. } => requests::apply(self, op),
            StoreOp::EnqueueJob { .. }
            | StoreOp::ClaimJob { .. }
            | StoreOp::RequeueJob { .. }
            | StoreOp::CompleteJob { .. }
            | StoreOp::FailJob { .. } => jobs::apply(self, op),
            StoreOp::AppendJobLog { .. } => logs::apply(self, op),
            StoreOp::EnqueueCompletion { .. }
            | StoreOp::ClaimCompletion { .. }
            | StoreOp::CompleteCompletion { .. }
            | StoreOp::FailCompletion { .. } => completions::apply(self, op),
            StoreOp::UpsertWorker { .. } => workers::apply(self, op),
        }
    }

    /// Live count of `claimed` jobs bound to `worker_id` — `activeJobCount`
    /// is always derived this way, never a stored counter (spec.md §4.4).
    pub fn active_job_count(&self, worker_id: &WorkerId) -> u64 {
        self.jobs
            .values()
            .filter(|j| {
                j.worker_id.as_ref() == Some(worker_id) && j.status == QueueItemStatus::Claimed
            })
            .count() as u64
    }

    pub fn requests_with_priority(&self, priority: Priority) -> usize {
        self.requests
            .values()
            .filter(|r| r.priority == priority)
            .count()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
