// SPDX-License-Identifier: MIT

//! Request queue handlers — enqueue/claim/complete/fail, CAS-guarded by
//! current `status` (spec.md §4.1, §4.3).

use pushpals_core::QueueItemStatus;

use super::{MaterializedState, StoreOp};
use crate::metrics::Sample;
use crate::StoreError;

pub(crate) fn apply(state: &mut MaterializedState, op: &StoreOp) -> Result<(), StoreError> {
    match op {
        StoreOp::EnqueueRequest { request } => {
            if state.requests.contains_key(&request.id) {
                return Ok(());
            }
            state
                .requests_pending
                .insert(request.id, request.priority, request.enqueued_at_epoch_ms);
            if let Some(key) = &request.idempotency_key {
                state.request_idempotency.insert(key.clone(), request.id);
            }
            state.requests.insert(request.id, (**request).clone());
            Ok(())
        }

        StoreOp::ClaimRequest {
            id,
            agent_id,
            at_epoch_ms,
        } => {
            let row = state
                .requests
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound {
                    kind: "request",
                    id: id.to_string(),
                })?;
            if row.status == QueueItemStatus::Claimed && row.agent_id.as_deref() == Some(agent_id)
            {
                return Ok(());
            }
            if row.status != QueueItemStatus::Pending {
                return Err(StoreError::Conflict {
                    kind: "request",
                    id: id.to_string(),
                    expected: "pending",
                    actual: row.status.to_string(),
                });
            }
            row.status = QueueItemStatus::Claimed;
            row.agent_id = Some(agent_id.clone());
            row.claimed_at_epoch_ms = Some(*at_epoch_ms);
            row.updated_at_epoch_ms = *at_epoch_ms;
            state
                .requests_pending
                .remove(id, row.priority, row.enqueued_at_epoch_ms);
            Ok(())
        }

        StoreOp::CompleteRequest {
            id,
            result,
            at_epoch_ms,
        } => {
            let row = state
                .requests
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound {
                    kind: "request",
                    id: id.to_string(),
                })?;
            if row.status == QueueItemStatus::Completed {
                return Ok(());
            }
            if row.status != QueueItemStatus::Claimed {
                return Err(StoreError::Conflict {
                    kind: "request",
                    id: id.to_string(),
                    expected: "claimed",
                    actual: row.status.to_string(),
                });
            }
            row.status = QueueItemStatus::Completed;
            row.result = Some(result.clone());
            row.completed_at_epoch_ms = Some(*at_epoch_ms);
            row.updated_at_epoch_ms = *at_epoch_ms;
            let claimed_at = row.claimed_at_epoch_ms.unwrap_or(*at_epoch_ms);
            let enqueued_at = row.enqueued_at_epoch_ms;
            state.request_metrics.record(Sample {
                queue_wait_ms: claimed_at.saturating_sub(enqueued_at),
                duration_ms: at_epoch_ms.saturating_sub(claimed_at),
                succeeded: true,
                timed_out: false,
            });
            Ok(())
        }

        StoreOp::FailRequest {
            id,
            message,
            detail,
            at_epoch_ms,
        } => {
            let row = state
                .requests
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound {
                    kind: "request",
                    id: id.to_string(),
                })?;
            if row.status == QueueItemStatus::Failed {
                return Ok(());
            }
            let was_pending = row.status == QueueItemStatus::Pending;
            let priority = row.priority;
            let enqueued_at = row.enqueued_at_epoch_ms;
            row.status = QueueItemStatus::Failed;
            row.error = Some(serde_json::json!({ "message": message, "detail": detail }));
            row.failed_at_epoch_ms = Some(*at_epoch_ms);
            row.updated_at_epoch_ms = *at_epoch_ms;
            let claimed_at = row.claimed_at_epoch_ms.unwrap_or(*at_epoch_ms);
            if was_pending {
                state.requests_pending.remove(id, priority, enqueued_at);
            }
            state.request_metrics.record(Sample {
                queue_wait_ms: claimed_at.saturating_sub(enqueued_at),
                duration_ms: at_epoch_ms.saturating_sub(claimed_at),
                succeeded: false,
                timed_out: was_pending,
            });
            Ok(())
        }

        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "requests_tests.rs"]
mod tests;
