// SPDX-License-Identifier: MIT

//! Bearer-token auth, checked once per HTTP call and on the initial WS/SSE
//! handshake — never re-checked per frame (spec.md §4.6).

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::AppState;
use pushpals_core::ErrorClass;
use pushpals_wire::ErrorBody;

const BEARER_PREFIX: &str = "Bearer ";

/// When `config.auth_token` is unset, auth is disabled entirely. Otherwise
/// every request must carry a matching `Authorization: Bearer <token>`
/// header.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = &state.config.auth_token else {
        return next.run(request).await;
    };

    let presented = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX));

    match presented {
        Some(token) if token == expected => next.run(request).await,
        _ => {
            let body = ErrorBody::new(ErrorClass::Validation, "missing or invalid bearer token");
            (StatusCode::UNAUTHORIZED, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
