// SPDX-License-Identifier: MIT

//! Job queue handlers — enqueue/claim/requeue/complete/fail, CAS-guarded
//! by current `status` (spec.md §4.1, §4.3, §4.4 worker-lost requeue).

use pushpals_core::QueueItemStatus;

use super::{MaterializedState, StoreOp};
use crate::metrics::Sample;
use crate::StoreError;

pub(crate) fn apply(state: &mut MaterializedState, op: &StoreOp) -> Result<(), StoreError> {
    match op {
        StoreOp::EnqueueJob { job } => {
            if state.jobs.contains_key(&job.id) {
                return Ok(());
            }
            state
                .jobs_pending
                .insert(job.id, job.priority, job.enqueued_at_epoch_ms);
            if let Some(key) = &job.idempotency_key {
                state.job_idempotency.insert(key.clone(), job.id);
            }
            state.jobs.insert(job.id, (**job).clone());
            Ok(())
        }

        StoreOp::ClaimJob {
            id,
            worker_id,
            at_epoch_ms,
        } => {
            let row = state.jobs.get_mut(id).ok_or_else(|| StoreError::NotFound {
                kind: "job",
                id: id.to_string(),
            })?;
            if row.status == QueueItemStatus::Claimed && row.worker_id.as_ref() == Some(worker_id)
            {
                return Ok(());
            }
            if row.status != QueueItemStatus::Pending {
                return Err(StoreError::Conflict {
                    kind: "job",
                    id: id.to_string(),
                    expected: "pending",
                    actual: row.status.to_string(),
                });
            }
            row.status = QueueItemStatus::Claimed;
            row.worker_id = Some(worker_id.clone());
            row.claimed_at_epoch_ms = Some(*at_epoch_ms);
            row.updated_at_epoch_ms = *at_epoch_ms;
            state
                .jobs_pending
                .remove(id, row.priority, row.enqueued_at_epoch_ms);
            Ok(())
        }

        StoreOp::RequeueJob { id, at_epoch_ms } => {
            let row = state.jobs.get_mut(id).ok_or_else(|| StoreError::NotFound {
                kind: "job",
                id: id.to_string(),
            })?;
            if row.status != QueueItemStatus::Claimed {
                // Already pending (replayed requeue) or terminal: no-op.
                return Ok(());
            }
            row.status = QueueItemStatus::Pending;
            row.worker_id = None;
            row.claimed_at_epoch_ms = None;
            row.started_at_epoch_ms = None;
            row.requeue_count += 1;
            row.updated_at_epoch_ms = *at_epoch_ms;
            state
                .jobs_pending
                .insert(*id, row.priority, row.enqueued_at_epoch_ms);
            Ok(())
        }

        StoreOp::CompleteJob {
            id,
            result,
            at_epoch_ms,
        } => {
            let row = state.jobs.get_mut(id).ok_or_else(|| StoreError::NotFound {
                kind: "job",
                id: id.to_string(),
            })?;
            if row.status == QueueItemStatus::Completed {
                return Ok(());
            }
            row.status = QueueItemStatus::Completed;
            row.result = result.clone();
            row.completed_at_epoch_ms = Some(*at_epoch_ms);
            row.updated_at_epoch_ms = *at_epoch_ms;
            let claimed_at = row.claimed_at_epoch_ms.unwrap_or(*at_epoch_ms);
            let enqueued_at = row.enqueued_at_epoch_ms;
            state.job_metrics.record(Sample {
                queue_wait_ms: claimed_at.saturating_sub(enqueued_at),
                duration_ms: at_epoch_ms.saturating_sub(claimed_at),
                succeeded: true,
                timed_out: false,
            });
            Ok(())
        }

        StoreOp::FailJob {
            id,
            message,
            detail,
            at_epoch_ms,
        } => {
            let row = state.jobs.get_mut(id).ok_or_else(|| StoreError::NotFound {
                kind: "job",
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
                state.jobs_pending.remove(id, priority, enqueued_at);
            }
            state.job_metrics.record(Sample {
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
#[path = "jobs_tests.rs"]
mod tests;
