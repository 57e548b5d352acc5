// SPDX-License-Identifier: MIT

//! `GET /sessions/{id}/events?after=<cursor>` SSE rendering (spec.md §4.6):
//! each delivered event is one `id:`/`data:` frame, cursor-keyed so a
//! reconnecting client can resume with `Last-Event-ID`/`after`.

use pushpals_core::PositionedEvent;

use crate::error::ProtocolError;

/// Render a single positioned event as an SSE frame: `id: <cursor>\ndata:
/// <envelope JSON>\n\n`. The trailing blank line is the frame terminator.
pub fn format_sse_event(positioned: &PositionedEvent) -> Result<String, ProtocolError> {
    let data = serde_json::to_string(&positioned.envelope).map_err(ProtocolError::Json)?;
    Ok(format!("id: {}\ndata: {}\n\n", positioned.cursor, data))
}

#[cfg(test)]
#[path = "sse_tests.rs"]
mod tests;
