// SPDX-License-Identifier: MIT

//! `ApiError`: the transport-facing error taxonomy (spec.md §7). Every
//! handler returns `Result<T, ApiError>`; `IntoResponse` renders the
//! `{error, class, detail}` body `pushpals_wire::ErrorBody` already
//! describes on the wire.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pushpals_core::ErrorClass;
use pushpals_storage::StoreError;
use pushpals_wire::ErrorBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("backpressure: {0}")]
    Backpressure(String),

    #[error("budget exceeded: {0}")]
    BudgetExceeded(String),

    #[error("worker lost: {0}")]
    WorkerLost(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) => ErrorClass::Validation,
            Self::Conflict(_) => ErrorClass::Conflict,
            Self::NotFound(_) => ErrorClass::NotFound,
            Self::Backpressure(_) => ErrorClass::Backpressure,
            Self::BudgetExceeded(_) => ErrorClass::BudgetExceeded,
            Self::WorkerLost(_) => ErrorClass::WorkerLost,
            Self::Transport(_) => ErrorClass::Transport,
            Self::Internal(_) => ErrorClass::Internal,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Backpressure(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::BudgetExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::WorkerLost(_) => StatusCode::CONFLICT,
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err.class() {
            ErrorClass::NotFound => Self::NotFound(err.to_string()),
            ErrorClass::Conflict => Self::Conflict(err.to_string()),
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.class().warrants_diagnostic_event() {
            tracing::warn!(error = %self, class = ?self.class(), "request rejected");
        } else {
            tracing::debug!(error = %self, class = ?self.class(), "request rejected");
        }
        let body = ErrorBody::new(self.class(), self.to_string());
        (self.status(), Json(body)).into_response()
    }
}
