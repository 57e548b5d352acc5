// SPDX-License-Identifier: MIT

//! `/completions/enqueue`, `/completions/claim`, `/completions/{id}/complete|fail`.

use axum::extract::{Path, State};
use axum::Json;
use pushpals_core::{Completion, CompletionId};
use pushpals_wire::completions::{
    ClaimCompletionBody, ClaimCompletionResponse, CompleteCompletionBody, EnqueueCompletionBody,
    EnqueueCompletionResponse, FailCompletionBody,
};
use pushpals_wire::requests::OkResponse;

use super::AppState;
use crate::error::ApiError;

pub async fn enqueue(
    State(state): State<AppState>,
    Json(body): Json<EnqueueCompletionBody>,
) -> Result<Json<EnqueueCompletionResponse>, ApiError> {
    let now = state.now();
    let completion = Completion {
        id: CompletionId::new(),
        job_id: body.job_id,
        session_id: pushpals_core::SessionId::new(body.session_id),
        commit_sha: body.commit_sha,
        branch: body.branch,
        message: body.message,
        idempotency_key: body.idempotency_key,
        status: pushpals_core::CompletionStatus::Pending,
        pusher_id: None,
        error: None,
        enqueued_at_epoch_ms: now,
        claimed_at_epoch_ms: None,
        completed_at_epoch_ms: None,
        failed_at_epoch_ms: None,
        updated_at_epoch_ms: now,
    };
    let completion_id = state.store.enqueue_completion(completion)?;
    Ok(Json(EnqueueCompletionResponse {
        ok: true,
        completion_id,
    }))
}

pub async fn claim(
    State(state): State<AppState>,
    Json(body): Json<ClaimCompletionBody>,
) -> Result<Json<ClaimCompletionResponse>, ApiError> {
    let completion = state.store.claim_next_completion(&body.pusher_id, state.now())?;
    Ok(Json(ClaimCompletionResponse { ok: true, completion }))
}

pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(_body): Json<CompleteCompletionBody>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = CompletionId::from_string(id);
    state.store.complete_completion(id, state.now())?;
    Ok(Json(OkResponse { ok: true }))
}

pub async fn fail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<FailCompletionBody>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = CompletionId::from_string(id);
    state
        .store
        .fail_completion(id, body.message, body.detail, state.now())?;
    Ok(Json(OkResponse { ok: true }))
}

#[cfg(test)]
#[path = "completions_tests.rs"]
mod tests;
