// SPDX-License-Identifier: MIT

//! `/requests/enqueue`, `/requests/claim`, `/requests/{id}/complete|fail`.

use axum::extract::{Path, State};
use axum::Json;
use pushpals_core::{Request, RequestId, SessionId};
use pushpals_wire::requests::{
    ClaimRequestBody, ClaimRequestResponse, CompleteRequestBody, EnqueueRequestBody,
    EnqueueRequestResponse, FailRequestBody, OkResponse,
};

use super::AppState;
use crate::error::ApiError;

pub async fn enqueue(
    State(state): State<AppState>,
    Json(body): Json<EnqueueRequestBody>,
) -> Result<Json<EnqueueRequestResponse>, ApiError> {
    let now = state.now();
    let request = Request {
        id: RequestId::new(),
        session_id: SessionId::new(body.session_id),
        original_prompt: body.original_prompt,
        enhanced_prompt: body.enhanced_prompt,
        idempotency_key: body.idempotency_key,
        priority: body.priority,
        queue_wait_budget_ms: body.queue_wait_budget_ms,
        status: pushpals_core::QueueItemStatus::Pending,
        agent_id: None,
        result: None,
        error: None,
        enqueued_at_epoch_ms: now,
        claimed_at_epoch_ms: None,
        completed_at_epoch_ms: None,
        failed_at_epoch_ms: None,
        updated_at_epoch_ms: now,
    };
    let request_id = state.store.enqueue_request(request)?;
    Ok(Json(EnqueueRequestResponse {
        ok: true,
        request_id,
    }))
}

pub async fn claim(
    State(state): State<AppState>,
    Json(body): Json<ClaimRequestBody>,
) -> Result<Json<ClaimRequestResponse>, ApiError> {
    let now = state.now();
    let request = state.store.claim_next_request(&body.agent_id, now)?;
    let queue_wait_ms = request
        .as_ref()
        .map(|r| now.saturating_sub(r.enqueued_at_epoch_ms));
    Ok(Json(ClaimRequestResponse {
        ok: true,
        request,
        queue_wait_ms,
    }))
}

pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CompleteRequestBody>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = RequestId::from_string(id);
    state
        .store
        .complete_request(id, body.result, state.now())?;
    Ok(Json(OkResponse { ok: true }))
}

pub async fn fail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<FailRequestBody>,
) -> Result<Json<OkResponse>, ApiError> {
    let id = RequestId::from_string(id);
    state
        .store
        .fail_request(id, body.message, body.detail, state.now())?;
    Ok(Json(OkResponse { ok: true }))
}

#[cfg(test)]
#[path = "requests_tests.rs"]
mod tests;
