// SPDX-License-Identifier: MIT

//! Per-session live event fan-out. One bounded `mpsc` channel per subscriber,
//! keyed by session — structurally the same shape as the daemon's
//! `ListenCtx`/`EventBus` split (`crates/daemon/src/listener/mod.rs`), but
//! using per-subscriber bounded channels rather than one broadcast per
//! topic so a slow subscriber only loses its own subscription instead of
//! forcing every subscriber to tolerate the same lag (spec.md §9
//! "subscriber set").

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use pushpals_core::{PositionedEvent, SessionId};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Why a subscription was closed by the hub rather than by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The subscriber's channel was full; it fell too far behind to keep up.
    Backpressure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SubscriberId(Uuid);

impl SubscriberId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A live subscription to one session's event stream.
pub struct Subscription {
    id: SubscriberId,
    session_id: SessionId,
    hub: SessionHub,
    receiver: mpsc::Receiver<PositionedEvent>,
}

impl Subscription {
    pub async fn recv(&mut self) -> Option<PositionedEvent> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(&self.session_id, self.id);
    }
}

#[derive(Default, Clone)]
struct SessionChannels {
    subscribers: HashMap<SubscriberId, mpsc::Sender<PositionedEvent>>,
}

/// Shared, cloneable handle — cheap to clone and pass through `AppState`.
#[derive(Clone)]
pub struct SessionHub {
    buffer: usize,
    sessions: Arc<Mutex<HashMap<SessionId, SessionChannels>>>,
}

impl SessionHub {
    pub fn new(buffer: usize) -> Self {
        Self {
            buffer: buffer.max(1),
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register a new subscriber for `session_id`. The caller is expected to
    /// have already pulled backlog via `Store::events_after` before
    /// subscribing, so no events are missed or duplicated across the
    /// resume/live boundary.
    pub fn subscribe(&self, session_id: &SessionId) -> Subscription {
        let id = SubscriberId::generate();
        let (tx, rx) = mpsc::channel(self.buffer);
        self.sessions
            .lock()
            .entry(session_id.clone())
            .or_default()
            .subscribers
            .insert(id, tx);
        Subscription {
            id,
            session_id: session_id.clone(),
            hub: self.clone(),
            receiver: rx,
        }
    }

    /// Publish one event to every live subscriber of `session_id`. A
    /// subscriber whose channel is full is dropped and its sender side
    /// closed, which surfaces as `Subscription::recv` returning `None` — the
    /// transport layer maps that to `CloseReason::Backpressure` and the
    /// client resumes from its last cursor.
    pub fn publish(&self, session_id: &SessionId, event: PositionedEvent) {
        let mut sessions = self.sessions.lock();
        let Some(channels) = sessions.get_mut(session_id) else {
            return;
        };
        channels.subscribers.retain(|_, sender| {
            match sender.try_send(event.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => false,
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            }
        });
        if channels.subscribers.is_empty() {
            sessions.remove(session_id);
        }
    }

    fn unsubscribe(&self, session_id: &SessionId, id: SubscriberId) {
        let mut sessions = self.sessions.lock();
        if let Some(channels) = sessions.get_mut(session_id) {
            channels.subscribers.remove(&id);
            if channels.subscribers.is_empty() {
                sessions.remove(session_id);
            }
        }
    }

    pub fn subscriber_count(&self, session_id: &SessionId) -> usize {
        self.sessions
            .lock()
            .get(session_id)
            .map(|c| c.subscribers.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "session_hub_tests.rs"]
mod tests;
