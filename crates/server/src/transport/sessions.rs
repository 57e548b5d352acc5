// SPDX-License-Identifier: MIT

//! `POST /sessions`, `POST /sessions/{id}/command`, and the two live-stream
//! surfaces over one session's event log (spec.md §4.6).

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use futures_util::stream::{self, Stream, StreamExt};
use pushpals_core::{Event, PositionedEvent, SessionId, PROTOCOL_VERSION};
use pushpals_wire::sessions::{
    CommandRequest, CommandResponse, CreateSessionRequest, CreateSessionResponse, EventsAfterQuery,
};
use pushpals_wire::sse::format_sse_event;

use super::AppState;
use crate::error::ApiError;
use crate::ingest::validate_command;
use crate::session_hub::Subscription;

pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let id = match body.session_id {
        Some(raw) => SessionId::new(raw),
        None => SessionId::generate(),
    };
    let already_existed = state.store.get_session(&id).is_some();
    state.store.create_session(id.clone(), state.now())?;
    Ok(Json(CreateSessionResponse {
        session_id: id,
        created: !already_existed,
    }))
}

pub async fn post_command(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(command): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    validate_command(&command)?;
    let session_id = SessionId::new(session_id);
    let now = state.now();
    if state.store.get_session(&session_id).is_none() {
        state.store.create_session(session_id.clone(), now)?;
    } else {
        state.store.touch_session(session_id.clone(), now)?;
    }

    let event_id = command.id.unwrap_or_default();
    let envelope = Event {
        protocol_version: PROTOCOL_VERSION,
        id: event_id,
        ts: chrono::Utc::now(),
        session_id: session_id.clone(),
        from: command.from,
        to: command.to,
        correlation_id: command.correlation_id,
        turn_id: command.turn_id,
        parent_id: command.parent_id,
        body: command.body,
    };
    let cursor = state.store.append_event(envelope.clone())?;
    state.hub.publish(
        &session_id,
        pushpals_core::PositionedEvent { envelope, cursor },
    );

    Ok(Json(CommandResponse {
        ok: true,
        event_id,
    }))
}

/// Chain the already-persisted backlog ahead of the live subscription so a
/// resuming client sees no gap and no duplicate (spec.md §4.2).
fn event_stream(backlog: Vec<PositionedEvent>, subscription: Subscription) -> impl Stream<Item = PositionedEvent> {
    stream::unfold(
        (backlog.into_iter(), subscription),
        |(mut backlog, mut subscription)| async move {
            if let Some(positioned) = backlog.next() {
                return Some((positioned, (backlog, subscription)));
            }
            let positioned = subscription.recv().await?;
            Some((positioned, (backlog, subscription)))
        },
    )
}

pub async fn sse_events(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<EventsAfterQuery>,
) -> impl IntoResponse {
    let session_id = SessionId::new(session_id);
    let backlog = state.store.events_after(&session_id, query.after);
    let subscription = state.hub.subscribe(&session_id);

    let stream = event_stream(backlog, subscription).filter_map(|positioned| async move {
        format_sse_event(&positioned)
            .ok()
            .map(|frame| Ok::<_, Infallible>(SseEvent::default().data(frame)))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    )
}

pub async fn ws_events(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<EventsAfterQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, SessionId::new(session_id), query.after))
}

/// Replay backlog then forward live events as `{envelope, cursor}` JSON
/// frames — deliberately a different shape from the SSE data line (spec.md
/// §9 "Per-session mutable state" treats SSE and WS as independent framings
/// of the same positioned-event stream).
async fn handle_socket(mut socket: WebSocket, state: AppState, session_id: SessionId, after: u64) {
    let backlog = state.store.events_after(&session_id, after);
    let mut subscription = state.hub.subscribe(&session_id);

    for positioned in backlog {
        let Ok(json) = serde_json::to_string(&positioned) else {
            continue;
        };
        if socket.send(Message::Text(json.into())).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            positioned = subscription.recv() => {
                let Some(positioned) = positioned else { return; };
                let Ok(json) = serde_json::to_string(&positioned) else { continue; };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    return;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => return,
                    Some(Err(_)) => return,
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "sessions_tests.rs"]
mod tests;
