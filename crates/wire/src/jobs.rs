// SPDX-License-Identifier: MIT

//! `/jobs/enqueue`, `/jobs/claim`, `/jobs/{id}/log|complete|fail`, `/jobs/{id}/logs`.

use pushpals_core::{Job, JobId, LogLine, LogStream, Priority, WorkerId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueJobBody {
    pub task_id: String,
    pub session_id: String,
    pub kind: String,
    pub params: serde_json::Value,
    #[serde(default)]
    pub target_worker_id: Option<WorkerId>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub execution_budget_ms: Option<u64>,
    #[serde(default)]
    pub finalization_budget_ms: Option<u64>,
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueJobResponse {
    pub ok: bool,
    pub job_id: JobId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimJobBody {
    pub worker_id: WorkerId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimJobResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLogBody {
    pub stream: LogStream,
    pub seq: u64,
    pub line: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCompleteBody {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFailBody {
    pub message: String,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLogsQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLogsResponse {
    pub lines: Vec<LogLine>,
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
