// SPDX-License-Identifier: MIT

//! Session Supervisor read models: `GET /requests`, `GET /jobs`,
//! `GET /completions`, `GET /system/status` (spec.md §4.7, §6).

use pushpals_core::{Completion, Job, Request};
use serde::{Deserialize, Serialize};

use crate::workers::WorkerSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequestsResponse {
    pub requests: Vec<Request>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsResponse {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCompletionsResponse {
    pub completions: Vec<Completion>,
}

/// A queue's recent terminal-transition rollup — the wire-facing mirror of
/// `pushpals_storage::QueueMetricsSnapshot`, kept as a separate type so the
/// wire crate doesn't need to depend on storage for one DTO.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRollup {
    pub sample_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_wait_p50_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_wait_p95_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_p50_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_p95_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatusResponse {
    pub workers: Vec<WorkerSummary>,
    pub requests: QueueRollup,
    pub jobs: QueueRollup,
    pub completions: QueueRollup,
}

#[cfg(test)]
#[path = "system_tests.rs"]
mod tests;
