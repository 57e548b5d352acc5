// SPDX-License-Identifier: MIT

//! Completion queue endpoints — symmetric with `requests.rs` per spec.md §6
//! ("Completion queue: symmetric enqueue/claim/complete/fail").

use pushpals_core::{Completion, CompletionId, JobId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueCompletionBody {
    pub job_id: JobId,
    pub session_id: String,
    pub commit_sha: String,
    pub branch: String,
    pub message: String,
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueCompletionResponse {
    pub ok: bool,
    pub completion_id: CompletionId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimCompletionBody {
    pub pusher_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimCompletionResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<Completion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteCompletionBody {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailCompletionBody {
    pub message: String,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

#[cfg(test)]
#[path = "completions_tests.rs"]
mod tests;
