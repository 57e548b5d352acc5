// SPDX-License-Identifier: MIT

//! The shared error-class taxonomy (spec.md §7). Each class is a classification
//! of failure, not a single identifier; [`pushpals_wire`]'s `ApiError` and
//! [`pushpals_storage`]'s `StoreError` map onto these classes at their own
//! boundary rather than sharing one monolithic error enum, matching the
//! teacher's per-crate `*Error` split.

use serde::{Deserialize, Serialize};

/// Coarse failure class, used to pick an HTTP status and to decide whether
/// a diagnostic event should be appended for subscribers to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Schema or type violation at ingest. Nothing persisted.
    Validation,
    /// CAS loss on claim/complete/fail. Idempotent read-back is safe.
    Conflict,
    /// Unknown session, row, or worker.
    NotFound,
    /// Subscriber channel overflow. Client retries with its cursor.
    Backpressure,
    /// Queue-wait or execution budget tripped by a watchdog.
    BudgetExceeded,
    /// Heartbeat TTL exceeded while claimed.
    WorkerLost,
    /// WS/SSE disconnect. Non-fatal; client resumes from cursor.
    Transport,
    /// Unexpected store failure. Event NOT appended.
    Internal,
}

crate::simple_display! {
    ErrorClass {
        Validation => "validation",
        Conflict => "conflict",
        NotFound => "not_found",
        Backpressure => "backpressure",
        BudgetExceeded => "budget_exceeded",
        WorkerLost => "worker_lost",
        Transport => "transport",
        Internal => "internal",
    }
}

impl ErrorClass {
    /// Whether a state-changing failure of this class should be surfaced to
    /// subscribers as a diagnostic `error` event, per spec.md §7's
    /// propagation policy.
    pub fn warrants_diagnostic_event(self) -> bool {
        !matches!(self, Self::Transport)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
