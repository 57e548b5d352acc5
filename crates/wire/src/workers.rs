// SPDX-License-Identifier: MIT

//! `PUT /workers/heartbeat` upsert and `GET /workers?ttlMs=` snapshot.

use std::collections::BTreeSet;

use pushpals_core::{WorkerId, WorkerPresence, WorkerStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatBody {
    pub worker_id: WorkerId,
    pub status: WorkerStatus,
    #[serde(default)]
    pub current_job_id: Option<String>,
    #[serde(default)]
    pub poll_ms: Option<u64>,
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
    #[serde(default)]
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkersQuery {
    #[serde(default)]
    pub ttl_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSummary {
    pub worker_id: WorkerId,
    pub status: WorkerStatus,
    pub presence: WorkerPresence,
    pub active_job_count: u64,
    pub last_heartbeat_epoch_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkersResponse {
    pub workers: Vec<WorkerSummary>,
}

#[cfg(test)]
#[path = "workers_tests.rs"]
mod tests;
