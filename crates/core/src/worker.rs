// SPDX-License-Identifier: MIT

//! Worker identifier and status.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// Unique identifier for a worker instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub String);

impl WorkerId {
    /// Create a new WorkerId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value of this WorkerId.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WorkerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for WorkerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for WorkerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for WorkerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Status a worker self-reports on heartbeat. `online`/`idle`/`busy` are
/// derived from this plus `lastHeartbeat` and `activeJobCount`, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Idle,
    Busy,
    Error,
    Offline,
}

crate::simple_display! {
    WorkerStatus {
        Idle => "idle",
        Busy => "busy",
        Error => "error",
        Offline => "offline",
    }
}

/// Derived presence for a worker, computed from `lastHeartbeat`, not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerPresence {
    Online,
    Offline,
}

/// A worker's registry row. `status`/`current_job_id`/`poll_ms`/
/// `capabilities`/`details` are exactly what the heartbeat upserts;
/// `online`/`idle`/`busy` are computed from this plus the heartbeat TTL
/// and the live claimed-job count, see [`WorkerRecord::presence`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRecord {
    pub worker_id: WorkerId,
    pub status: WorkerStatus,
    pub current_job_id: Option<String>,
    pub poll_ms: Option<u64>,
    pub capabilities: BTreeSet<String>,
    pub details: serde_json::Value,
    pub last_heartbeat_epoch_ms: u64,
    pub created_at_epoch_ms: u64,
    pub updated_at_epoch_ms: u64,
}

impl WorkerRecord {
    /// `now - lastHeartbeat < ttl_ms` per spec §3/§4.4.
    pub fn presence(&self, now_epoch_ms: u64, ttl_ms: u64) -> WorkerPresence {
        if now_epoch_ms.saturating_sub(self.last_heartbeat_epoch_ms) < ttl_ms {
            WorkerPresence::Online
        } else {
            WorkerPresence::Offline
        }
    }

    /// `online ∧ status=idle ∧ activeJobCount=0`.
    pub fn is_idle(&self, now_epoch_ms: u64, ttl_ms: u64, active_job_count: u64) -> bool {
        self.presence(now_epoch_ms, ttl_ms) == WorkerPresence::Online
            && self.status == WorkerStatus::Idle
            && active_job_count == 0
    }

    /// `online ∧ (status=busy ∨ activeJobCount>0)`.
    pub fn is_busy(&self, now_epoch_ms: u64, ttl_ms: u64, active_job_count: u64) -> bool {
        self.presence(now_epoch_ms, ttl_ms) == WorkerPresence::Online
            && (self.status == WorkerStatus::Busy || active_job_count > 0)
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
