// SPDX-License-Identifier: MIT

//! The event envelope and its closed set of typed payloads (spec.md §6).
//!
//! `type` is adjacently tagged with its `payload`: on the wire this reads
//! as `{"type": "job_completed", "payload": {...}, ...envelope fields}`.
//! Unknown `type` values fail to deserialize, which Command Ingest turns
//! into `UnknownEventType` rather than silently accepting it (spec.md §4.5).

mod payloads;

pub use payloads::*;

use crate::session::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Globally unique event id. A UUID rather than a [`crate::id::IdBuf`] id
/// because spec.md §3 names the envelope `id` field's type explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub uuid::Uuid);

impl EventId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::generate()
    }
}

/// The append-only protocol message. `cursor` is assigned by the Event Log
/// at append time, not by the caller — it is absent from the inbound
/// Command Ingest payload and present on every persisted/delivered copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub protocol_version: u32,
    pub id: EventId,
    pub ts: DateTime<Utc>,
    pub session_id: SessionId,
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub body: EventBody,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        EventKind::from(&self.body)
    }
}

/// The current protocol version stamped on every envelope.
pub const PROTOCOL_VERSION: u32 = 1;

/// The closed `type` taxonomy, adjacently tagged with its payload under
/// `payload`. Grouped exactly as spec.md §6 lists them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum EventBody {
    // chat/control
    Message(MessagePayload),
    AssistantMessage(AssistantMessagePayload),
    AgentStatus(AgentStatusPayload),
    // tasks
    TaskCreated(TaskCreatedPayload),
    TaskStarted(TaskStartedPayload),
    TaskProgress(TaskProgressPayload),
    TaskCompleted(TaskCompletedPayload),
    TaskFailed(TaskFailedPayload),
    // jobs
    JobEnqueued(JobEnqueuedPayload),
    JobClaimed(JobClaimedPayload),
    JobLog(JobLogPayload),
    JobCompleted(JobCompletedPayload),
    JobFailed(JobFailedPayload),
    // approvals
    ApprovalRequired(ApprovalRequiredPayload),
    Approved(ApprovedPayload),
    Denied(DeniedPayload),
    // integration
    DiffReady(DiffReadyPayload),
    Committed(CommittedPayload),
    // diagnostic
    Log(LogPayload),
    Error(ErrorPayload),
    // delegation
    DelegateRequest(DelegateRequestPayload),
    DelegateResponse(DelegateResponsePayload),
}

/// Tag-only projection of [`EventBody`], for status DTOs and metrics that
/// need the `type` without the payload (mirrors the teacher's
/// `StepStatus`/`StepStatusKind` split).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Message,
    AssistantMessage,
    AgentStatus,
    TaskCreated,
    TaskStarted,
    TaskProgress,
    TaskCompleted,
    TaskFailed,
    JobEnqueued,
    JobClaimed,
    JobLog,
    JobCompleted,
    JobFailed,
    ApprovalRequired,
    Approved,
    Denied,
    DiffReady,
    Committed,
    Log,
    Error,
    DelegateRequest,
    DelegateResponse,
}

impl From<&EventBody> for EventKind {
    fn from(body: &EventBody) -> Self {
        match body {
            EventBody::Message(_) => Self::Message,
            EventBody::AssistantMessage(_) => Self::AssistantMessage,
            EventBody::AgentStatus(_) => Self::AgentStatus,
            EventBody::TaskCreated(_) => Self::TaskCreated,
            EventBody::TaskStarted(_) => Self::TaskStarted,
            EventBody::TaskProgress(_) => Self::TaskProgress,
            EventBody::TaskCompleted(_) => Self::TaskCompleted,
            EventBody::TaskFailed(_) => Self::TaskFailed,
            EventBody::JobEnqueued(_) => Self::JobEnqueued,
            EventBody::JobClaimed(_) => Self::JobClaimed,
            EventBody::JobLog(_) => Self::JobLog,
            EventBody::JobCompleted(_) => Self::JobCompleted,
            EventBody::JobFailed(_) => Self::JobFailed,
            EventBody::ApprovalRequired(_) => Self::ApprovalRequired,
            EventBody::Approved(_) => Self::Approved,
            EventBody::Denied(_) => Self::Denied,
            EventBody::DiffReady(_) => Self::DiffReady,
            EventBody::Committed(_) => Self::Committed,
            EventBody::Log(_) => Self::Log,
            EventBody::Error(_) => Self::Error,
            EventBody::DelegateRequest(_) => Self::DelegateRequest,
            EventBody::DelegateResponse(_) => Self::DelegateResponse,
        }
    }
}

/// A positioned envelope: the shape persisted and delivered to
/// subscribers, pairing the envelope with its assigned cursor (spec.md §3,
/// §6 — this is the WS frame `{envelope, cursor}` shape verbatim).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedEvent {
    pub envelope: Event,
    pub cursor: u64,
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
