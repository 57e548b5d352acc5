// SPDX-License-Identifier: MIT

//! Per-job log line stream — append-only, ordered by producer-assigned
//! `seq` within `(job_id, stream)` (spec.md §3, §8).

use super::{MaterializedState, StoreOp};
use crate::StoreError;

pub(crate) fn apply(state: &mut MaterializedState, op: &StoreOp) -> Result<(), StoreError> {
    match op {
        StoreOp::AppendJobLog { line } => {
            let bucket = state.logs.entry(line.job_id).or_default();
            let duplicate = bucket
                .iter()
                .any(|l| l.stream == line.stream && l.seq == line.seq);
            if duplicate {
                return Ok(());
            }
            bucket.push((**line).clone());
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "logs_tests.rs"]
mod tests;
