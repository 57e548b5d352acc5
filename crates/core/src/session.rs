// SPDX-License-Identifier: MIT

//! Session identifier and the session record it scopes.
//!
//! A session owns an event log and scopes every queue and worker
//! assignment made on its behalf. `SessionId` is a plain string rather
//! than a prefixed [`crate::id::IdBuf`] id because it may be caller-supplied
//! (`POST /sessions {"sessionId": "dev"}`) as well as server-generated.

use crate::clock::Clock;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a session, either user-supplied or server-generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Create a `SessionId` from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a server-assigned id (used when the caller omits `sessionId`).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for SessionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SessionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A session record. Owns the event log and scopes all queues and worker
/// assignments for that session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub created_at_epoch_ms: u64,
    pub last_activity_at_epoch_ms: u64,
    /// Cached latest cursor; mirrors the event log's per-session counter so
    /// supervisor reads don't need a second lookup.
    pub last_event_cursor: u64,
}

impl Session {
    pub fn new(id: SessionId, clock: &impl Clock) -> Self {
        let now = clock.epoch_ms();
        Self {
            id,
            created_at_epoch_ms: now,
            last_activity_at_epoch_ms: now,
            last_event_cursor: 0,
        }
    }

    pub fn touch(&mut self, clock: &impl Clock) {
        self.last_activity_at_epoch_ms = clock.epoch_ms();
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
