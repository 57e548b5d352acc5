// SPDX-License-Identifier: MIT

//! Completion: a post-job artifact queued for integration by the SCM.

use crate::job::JobId;
use crate::queue_item::CompletionStatus;
use crate::session::SessionId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier for a completion row.
    pub struct CompletionId("cmp-");
}

/// A completion awaiting SCM integration.
///
/// Lifecycle: `pending -> claimed -> (processed | failed)`; terminal
/// states are sticky. Created by the job producer, not automatically by
/// the Queue Manager (spec.md §4.3 "Completion queue coupling").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub id: CompletionId,
    pub job_id: JobId,
    pub session_id: SessionId,
    pub commit_sha: String,
    pub branch: String,
    pub message: String,
    /// Caller-supplied dedup key, symmetric with [`crate::request::Request`]
    /// and [`crate::job::Job`] (spec.md §3).
    pub idempotency_key: Option<String>,
    pub status: CompletionStatus,
    pub pusher_id: Option<String>,
    pub error: Option<serde_json::Value>,
    pub enqueued_at_epoch_ms: u64,
    pub claimed_at_epoch_ms: Option<u64>,
    pub completed_at_epoch_ms: Option<u64>,
    pub failed_at_epoch_ms: Option<u64>,
    pub updated_at_epoch_ms: u64,
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct CompletionBuilder => Completion {
        set { id: CompletionId = CompletionId::new() }
        set { job_id: JobId = JobId::new() }
        into { session_id: SessionId = "test-session" }
        into { commit_sha: String = "deadbeef" }
        into { branch: String = "pushpals/work" }
        into { message: String = "apply patch" }
        option { idempotency_key: String = None }
        set { status: CompletionStatus = CompletionStatus::Pending }
        option { pusher_id: String = None }
        option { error: serde_json::Value = None }
        set { enqueued_at_epoch_ms: u64 = 0 }
        option { claimed_at_epoch_ms: u64 = None }
        option { completed_at_epoch_ms: u64 = None }
        option { failed_at_epoch_ms: u64 = None }
        set { updated_at_epoch_ms: u64 = 0 }
    }
}

#[cfg(test)]
#[path = "completion_tests.rs"]
mod tests;
