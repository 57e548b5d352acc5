// SPDX-License-Identifier: MIT

//! `POST /sessions`, `POST /sessions/{id}/command`, `GET /system/status`.

use pushpals_core::event::EventBody;
use pushpals_core::{EventId, SessionId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: SessionId,
    pub created: bool,
}

/// Body of `POST /sessions/{id}/command`. The envelope's own `from`,
/// `to`, `correlationId`, `turnId`, and `parentId` travel inside `body`;
/// `protocolVersion`, `id`, `ts`, `sessionId`, and `cursor` are assigned or
/// overwritten by Command Ingest regardless of what the caller sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    #[serde(default)]
    pub id: Option<EventId>,
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub ok: bool,
    pub event_id: EventId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsAfterQuery {
    #[serde(default)]
    pub after: u64,
}

#[cfg(test)]
#[path = "sessions_tests.rs"]
mod tests;
