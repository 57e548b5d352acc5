// SPDX-License-Identifier: MIT

//! Completion queue handlers — enqueue/claim/complete/fail, CAS-guarded by
//! current `status` (spec.md §4.1, §4.3 completion-queue coupling). Unlike
//! requests and jobs, completions carry no priority of their own; the
//! pending index orders them by `enqueuedAt` then id alone.

use pushpals_core::{CompletionStatus, Priority};

use super::{MaterializedState, StoreOp};
use crate::metrics::Sample;
use crate::StoreError;

const COMPLETION_PRIORITY: Priority = Priority::Normal;

pub(crate) fn apply(state: &mut MaterializedState, op: &StoreOp) -> Result<(), StoreError> {
    match op {
        StoreOp::EnqueueCompletion { completion } => {
            if state.completions.contains_key(&completion.id) {
                return Ok(());
            }
            state.completions_pending.insert(
                completion.id,
                COMPLETION_PRIORITY,
                completion.enqueued_at_epoch_ms,
            );
            if let Some(key) = &completion.idempotency_key {
                state
                    .completion_idempotency
                    .insert(key.clone(), completion.id);
            }
            state
                .completions
                .insert(completion.id, (**completion).clone());
            Ok(())
        }

        StoreOp::ClaimCompletion {
            id,
            pusher_id,
            at_epoch_ms,
        } => {
            let row = state
                .completions
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound {
                    kind: "completion",
                    id: id.to_string(),
                })?;
            if row.status == CompletionStatus::Claimed
                && row.pusher_id.as_deref() == Some(pusher_id)
            {
                return Ok(());
            }
            if row.status != CompletionStatus::Pending {
                return Err(StoreError::Conflict {
                    kind: "completion",
                    id: id.to_string(),
                    expected: "pending",
                    actual: row.status.to_string(),
                });
            }
            row.status = CompletionStatus::Claimed;
            row.pusher_id = Some(pusher_id.clone());
            row.claimed_at_epoch_ms = Some(*at_epoch_ms);
            row.updated_at_epoch_ms = *at_epoch_ms;
            state
                .completions_pending
                .remove(id, COMPLETION_PRIORITY, row.enqueued_at_epoch_ms);
            Ok(())
        }

        StoreOp::CompleteCompletion { id, at_epoch_ms } => {
            let row = state
                .completions
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound {
                    kind: "completion",
                    id: id.to_string(),
                })?;
            if row.status == CompletionStatus::Processed {
                return Ok(());
            }
            row.status = CompletionStatus::Processed;
            row.completed_at_epoch_ms = Some(*at_epoch_ms);
            row.updated_at_epoch_ms = *at_epoch_ms;
            let claimed_at = row.claimed_at_epoch_ms.unwrap_or(*at_epoch_ms);
            let enqueued_at = row.enqueued_at_epoch_ms;
            state.completion_metrics.record(Sample {
                queue_wait_ms: claimed_at.saturating_sub(enqueued_at),
                duration_ms: at_epoch_ms.saturating_sub(claimed_at),
                succeeded: true,
                timed_out: false,
            });
            Ok(())
        }

        StoreOp::FailCompletion {
            id,
            message,
            detail,
            at_epoch_ms,
        } => {
            let row = state
                .completions
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound {
                    kind: "completion",
                    id: id.to_string(),
                })?;
            if row.status == CompletionStatus::Failed {
                return Ok(());
            }
            let was_pending = row.status == CompletionStatus::Pending;
            let enqueued_at = row.enqueued_at_epoch_ms;
            row.status = CompletionStatus::Failed;
            row.error = Some(serde_json::json!({ "message": message, "detail": detail }));
            row.failed_at_epoch_ms = Some(*at_epoch_ms);
            row.updated_at_epoch_ms = *at_epoch_ms;
            let claimed_at = row.claimed_at_epoch_ms.unwrap_or(*at_epoch_ms);
            if was_pending {
                state
                    .completions_pending
                    .remove(id, COMPLETION_PRIORITY, enqueued_at);
            }
            state.completion_metrics.record(Sample {
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
#[path = "completions_tests.rs"]
mod tests;
