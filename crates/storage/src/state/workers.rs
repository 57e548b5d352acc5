// SPDX-License-Identifier: MIT

//! Worker registry handler — a heartbeat is an upsert by `worker_id`, never
//! a create/update distinction the caller has to make (spec.md §4.4).

use super::{MaterializedState, StoreOp};
use crate::StoreError;

pub(crate) fn apply(state: &mut MaterializedState, op: &StoreOp) -> Result<(), StoreError> {
    match op {
        StoreOp::UpsertWorker { record } => {
            match state.workers.get_mut(&record.worker_id) {
                Some(existing) if existing.updated_at_epoch_ms >= record.updated_at_epoch_ms => {
                    // Stale or duplicate heartbeat replay: keep the newer row.
                }
                Some(existing) => {
                    let created_at = existing.created_at_epoch_ms;
                    *existing = (**record).clone();
                    existing.created_at_epoch_ms = created_at;
                }
                None => {
                    state.workers.insert(record.worker_id.clone(), (**record).clone());
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "workers_tests.rs"]
mod tests;
