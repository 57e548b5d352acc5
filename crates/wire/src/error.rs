// SPDX-License-Identifier: MIT

//! The wire rendering of the §7 error taxonomy, shared by every endpoint.

use pushpals_core::ErrorClass;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body every rejecting endpoint returns: `{error, class, detail?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub class: ErrorClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            class,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Malformed-wire failures below the application's error taxonomy: bodies
/// that don't even parse as JSON, or JSON that doesn't match the expected
/// shape. These never reach `ErrorClass` directly; the ingest boundary
/// turns them into `ErrorClass::Validation` before responding.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown event type: {0}")]
    UnknownEventType(String),
    #[error("duplicate event id: {0}")]
    DuplicateEvent(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
