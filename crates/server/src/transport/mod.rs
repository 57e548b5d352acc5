// SPDX-License-Identifier: MIT

//! The HTTP/SSE/WS transport layer: one `axum::Router` sharing one
//! `AppState`, grounded on `iwismer-rusty-timer`'s `server`/`receiver`
//! crates and `adamtc007-ob-poc`'s `ob-poc-web` (both expose axum HTTP+WS
//! servers over shared state guarded by a lock) — the daemon itself has no
//! precedent here, it speaks a private length-prefixed socket protocol, not
//! HTTP (spec.md §4.6, SPEC_FULL.md §4.6).

mod auth;
mod completions;
mod jobs;
mod requests;
mod sessions;
mod system;
mod workers;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use pushpals_core::{Clock, SystemClock};
use pushpals_storage::Store;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::PushPalsConfig;
use crate::session_hub::SessionHub;

/// Shared application state passed by value (cheap — everything inside is
/// an `Arc` or already `Clone`) to every handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub hub: SessionHub,
    pub config: Arc<PushPalsConfig>,
    pub clock: SystemClock,
}

impl AppState {
    pub fn new(store: Arc<Store>, hub: SessionHub, config: Arc<PushPalsConfig>) -> Self {
        Self {
            store,
            hub,
            config,
            clock: SystemClock,
        }
    }

    pub fn now(&self) -> u64 {
        self.clock.epoch_ms()
    }
}

/// Assemble the full router: every endpoint spec.md §6 names, wrapped in
/// permissive CORS, request tracing, and (when `config.auth_token` is set)
/// bearer-token auth on every HTTP call and the initial WS/SSE handshake.
pub fn build_router(state: AppState) -> Router {
    let auth_state = state.clone();
    Router::new()
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/:id/command", post(sessions::post_command))
        .route("/sessions/:id/events", get(sessions::sse_events))
        .route("/sessions/:id/ws", get(sessions::ws_events))
        .route("/requests/enqueue", post(requests::enqueue))
        .route("/requests/claim", post(requests::claim))
        .route("/requests/:id/complete", post(requests::complete))
        .route("/requests/:id/fail", post(requests::fail))
        .route("/jobs/enqueue", post(jobs::enqueue))
        .route("/jobs/claim", post(jobs::claim))
        .route("/jobs/:id/log", post(jobs::log))
        .route("/jobs/:id/complete", post(jobs::complete))
        .route("/jobs/:id/fail", post(jobs::fail))
        .route("/jobs/:id/logs", get(jobs::logs))
        .route("/completions/enqueue", post(completions::enqueue))
        .route("/completions/claim", post(completions::claim))
        .route("/completions/:id/complete", post(completions::complete))
        .route("/completions/:id/fail", post(completions::fail))
        .route("/workers/heartbeat", put(workers::heartbeat))
        .route("/workers", get(workers::list))
        .route("/system/status", get(system::status))
        .route("/requests", get(system::list_requests))
        .route("/jobs", get(system::list_jobs))
        .route("/completions", get(system::list_completions))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth::require_bearer_token,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
