// SPDX-License-Identifier: MIT

//! Session lifecycle handlers.

use super::{MaterializedState, StoreOp};
use crate::StoreError;

pub(crate) fn apply(state: &mut MaterializedState, op: &StoreOp) -> Result<(), StoreError> {
    match op {
        StoreOp::CreateSession { id, at_epoch_ms } => {
            // Idempotent: re-applying a CreateSession for an id that
            // already exists is a no-op, it never resets last_activity.
            state
                .sessions
                .entry(id.clone())
                .or_insert_with(|| pushpals_core::Session {
                    id: id.clone(),
                    created_at_epoch_ms: *at_epoch_ms,
                    last_activity_at_epoch_ms: *at_epoch_ms,
                    last_event_cursor: 0,
                });
            Ok(())
        }

        StoreOp::TouchSession { id, at_epoch_ms } => {
            if let Some(session) = state.sessions.get_mut(id) {
                session.last_activity_at_epoch_ms = session.last_activity_at_epoch_ms.max(*at_epoch_ms);
            }
            Ok(())
        }

        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "sessions_tests.rs"]
mod tests;
