// SPDX-License-Identifier: MIT

//! `GET /requests`, `GET /jobs`, `GET /completions`, `GET /system/status` —
//! thin wire adapters over `supervisor`'s read models.

use axum::extract::State;
use axum::Json;
use pushpals_wire::system::{ListCompletionsResponse, ListJobsResponse, ListRequestsResponse, SystemStatusResponse};

use super::AppState;
use crate::supervisor;

pub async fn list_requests(State(state): State<AppState>) -> Json<ListRequestsResponse> {
    Json(supervisor::list_requests(&state.store))
}

pub async fn list_jobs(State(state): State<AppState>) -> Json<ListJobsResponse> {
    Json(supervisor::list_jobs(&state.store))
}

pub async fn list_completions(State(state): State<AppState>) -> Json<ListCompletionsResponse> {
    Json(supervisor::list_completions(&state.store))
}

pub async fn status(State(state): State<AppState>) -> Json<SystemStatusResponse> {
    Json(supervisor::system_status(&state.store, state.now(), state.config.heartbeat_ttl_ms))
}

#[cfg(test)]
#[path = "system_tests.rs"]
mod tests;
