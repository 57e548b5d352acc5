// SPDX-License-Identifier: MIT

//! Request: an enqueued user prompt awaiting orchestrator planning.

use crate::priority::Priority;
use crate::queue_item::QueueItemStatus;
use crate::session::SessionId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier for a request row.
    pub struct RequestId("req-");
}

/// A request awaiting orchestrator (RemoteBuddy) planning.
///
/// Lifecycle: `pending -> claimed -> (completed | failed)`; terminal
/// states are sticky (spec.md §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: RequestId,
    pub session_id: SessionId,
    pub original_prompt: String,
    pub enhanced_prompt: String,
    /// Caller-supplied dedup key: enqueuing a second request with the same
    /// key returns the existing row's id instead of creating a new one
    /// (spec.md §3).
    pub idempotency_key: Option<String>,
    pub priority: Priority,
    pub queue_wait_budget_ms: Option<u64>,
    pub status: QueueItemStatus,
    pub agent_id: Option<String>,
    pub result: Option<serde_json::Value>,
    pub error: Option<serde_json::Value>,
    pub enqueued_at_epoch_ms: u64,
    pub claimed_at_epoch_ms: Option<u64>,
    pub completed_at_epoch_ms: Option<u64>,
    pub failed_at_epoch_ms: Option<u64>,
    pub updated_at_epoch_ms: u64,
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct RequestBuilder => Request {
        set { id: RequestId = RequestId::new() }
        into { session_id: SessionId = "test-session" }
        into { original_prompt: String = "do the thing" }
        into { enhanced_prompt: String = "do the thing, with context" }
        option { idempotency_key: String = None }
        set { priority: Priority = Priority::Normal }
        option { queue_wait_budget_ms: u64 = None }
        set { status: QueueItemStatus = QueueItemStatus::Pending }
        option { agent_id: String = None }
        option { result: serde_json::Value = None }
        option { error: serde_json::Value = None }
        set { enqueued_at_epoch_ms: u64 = 0 }
        option { claimed_at_epoch_ms: u64 = None }
        option { completed_at_epoch_ms: u64 = None }
        option { failed_at_epoch_ms: u64 = None }
        set { updated_at_epoch_ms: u64 = 0 }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
