// SPDX-License-Identifier: MIT

//! `PUT /workers/heartbeat`, `GET /workers`.

use axum::extract::{Query, State};
use axum::Json;
use pushpals_core::WorkerRecord;
use pushpals_wire::workers::{HeartbeatBody, HeartbeatResponse, ListWorkersQuery, ListWorkersResponse};

use super::AppState;
use crate::error::ApiError;
use crate::supervisor;

pub async fn heartbeat(
    State(state): State<AppState>,
    Json(body): Json<HeartbeatBody>,
) -> Result<Json<HeartbeatResponse>, ApiError> {
    let now = state.now();
    let created_at_epoch_ms = state
        .store
        .get_worker(&body.worker_id)
        .map(|existing| existing.created_at_epoch_ms)
        .unwrap_or(now);
    let record = WorkerRecord {
        worker_id: body.worker_id,
        status: body.status,
        current_job_id: body.current_job_id,
        poll_ms: body.poll_ms,
        capabilities: body.capabilities,
        details: body.details,
        last_heartbeat_epoch_ms: now,
        created_at_epoch_ms,
        updated_at_epoch_ms: now,
    };
    state.store.upsert_worker(record)?;
    Ok(Json(HeartbeatResponse { ok: true }))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListWorkersQuery>,
) -> Json<ListWorkersResponse> {
    let now = state.now();
    let ttl_ms = query.ttl_ms.unwrap_or(state.config.heartbeat_ttl_ms);
    let workers = supervisor::list_worker_summaries(&state.store, now, ttl_ms);
    Json(ListWorkersResponse { workers })
}

#[cfg(test)]
#[path = "workers_tests.rs"]
mod tests;
