// SPDX-License-Identifier: MIT

//! Event log append. Cursor assignment happens before the op is built
//! (the caller reserves the next cursor under the same lock that appends
//! to the WAL), so `apply` only needs to store what it is given.

use pushpals_core::PositionedEvent;

use super::{MaterializedState, StoreOp};
use crate::StoreError;

pub(crate) fn apply(state: &mut MaterializedState, op: &StoreOp) -> Result<(), StoreError> {
    let StoreOp::AppendEvent { envelope, cursor } = op else {
        return Ok(());
    };

    let session_id = envelope.session_id.clone();
    let bucket = state.events.entry(session_id.clone()).or_default();

    // Idempotent: a replayed append with a cursor already present is a
    // no-op rather than a duplicate entry.
    if bucket.iter().any(|p| p.cursor == *cursor) {
        return Ok(());
    }

    bucket.push(PositionedEvent {
        envelope: envelope.as_ref().clone(),
        cursor: *cursor,
    });

    let slot = state.event_cursors.entry(session_id.clone()).or_insert(0);
    *slot = (*slot).max(*cursor);

    if let Some(session) = state.sessions.get_mut(&session_id) {
        session.last_event_cursor = session.last_event_cursor.max(*cursor);
    }

    Ok(())
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
