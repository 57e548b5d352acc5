// SPDX-License-Identifier: MIT

//! The three independent watchdogs spec.md §9 calls for: queue-wait budget,
//! execution budget, and worker-heartbeat TTL. Each runs its own
//! `tokio::time::interval` loop, is idempotent across restarts (it only
//! acts on rows still in the state a violation implies — a replay after
//! crash recovery re-derives the same verdict), and logs a `debug` summary
//! per tick (count examined / count actioned).

use std::sync::Arc;
use std::time::Duration;

use pushpals_core::{Event, EventBody, EventId, ErrorPayload, QueueItemStatus, PROTOCOL_VERSION};
use pushpals_storage::Store;

use crate::config::PushPalsConfig;
use crate::session_hub::SessionHub;

fn now_epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn emit_diagnostic(store: &Store, hub: &SessionHub, session_id: &pushpals_core::SessionId, class: &str, message: String) {
    let envelope = Event {
        protocol_version: PROTOCOL_VERSION,
        id: EventId::generate(),
        ts: chrono::Utc::now(),
        session_id: session_id.clone(),
        from: "watchdog".into(),
        to: None,
        correlation_id: None,
        turn_id: None,
        parent_id: None,
        body: EventBody::Error(ErrorPayload {
            class: class.into(),
            message,
            detail: None,
        }),
    };
    if let Ok(cursor) = store.append_event(envelope.clone()) {
        hub.publish(
            session_id,
            pushpals_core::PositionedEvent { envelope, cursor },
        );
    }
}

/// Fails any still-pending request whose `queueWaitBudgetMs` has elapsed
/// since it was enqueued (spec.md §4.3, §7 `budget_exceeded`).
async fn queue_wait_budget_tick(store: &Store, hub: &SessionHub, now: u64) {
    let mut examined = 0u64;
    let mut actioned = 0u64;
    for request in store.list_requests() {
        if request.status != QueueItemStatus::Pending {
            continue;
        }
        examined += 1;
        let Some(budget) = request.queue_wait_budget_ms else {
            continue;
        };
        if now.saturating_sub(request.enqueued_at_epoch_ms) < budget {
            continue;
        }
        if store
            .fail_request(
                request.id,
                "queue-wait budget exceeded".into(),
                None,
                now,
            )
            .is_ok()
        {
            actioned += 1;
            emit_diagnostic(
                store,
                hub,
                &request.session_id,
                "budget_exceeded",
                format!("request {} exceeded its queue-wait budget", request.id),
            );
        }
    }
    tracing::debug!(examined, actioned, "queue-wait budget watchdog tick");
}

/// Fails any claimed job whose `executionBudgetMs` has elapsed since it was
/// claimed (spec.md §4.3, §7 `budget_exceeded`).
async fn execution_budget_tick(store: &Store, hub: &SessionHub, now: u64) {
    let mut examined = 0u64;
    let mut actioned = 0u64;
    for job in store.list_jobs() {
        if job.status != QueueItemStatus::Claimed {
            continue;
        }
        examined += 1;
        let Some(budget) = job.execution_budget_ms else {
            continue;
        };
        let Some(claimed_at) = job.claimed_at_epoch_ms else {
            continue;
        };
        if now.saturating_sub(claimed_at) < budget {
            continue;
        }
        if store
            .fail_job(job.id, "execution budget exceeded".into(), None, now)
            .is_ok()
        {
            actioned += 1;
            emit_diagnostic(
                store,
                hub,
                &job.session_id,
                "budget_exceeded",
                format!("job {} exceeded its execution budget", job.id),
            );
        }
    }
    tracing::debug!(examined, actioned, "execution budget watchdog tick");
}

/// Requeues a claimed job whose worker has stopped heartbeating past the
/// TTL, up to `worker_lost_max_requeues` times, after which it fails with
/// `worker-lost` (spec.md §4.4, §7 `worker_lost`, §8 scenario 6).
async fn worker_heartbeat_tick(store: &Store, hub: &SessionHub, now: u64, ttl_ms: u64, max_requeues: u32) {
    let mut examined = 0u64;
    let mut actioned = 0u64;
    for job in store.list_jobs() {
        if job.status != QueueItemStatus::Claimed {
            continue;
        }
        let Some(worker_id) = &job.worker_id else {
            continue;
        };
        let Some(worker) = store.get_worker(worker_id) else {
            continue;
        };
        examined += 1;
        if worker.presence(now, ttl_ms) == pushpals_core::WorkerPresence::Online {
            continue;
        }
        if job.requeue_count >= max_requeues {
            if store
                .fail_job(job.id, "worker-lost".into(), None, now)
                .is_ok()
            {
                actioned += 1;
                emit_diagnostic(
                    store,
                    hub,
                    &job.session_id,
                    "worker_lost",
                    format!("job {} abandoned by lost worker {worker_id}", job.id),
                );
            }
        } else if store.requeue_job(job.id, now).is_ok() {
            actioned += 1;
        }
    }
    tracing::debug!(examined, actioned, "worker-heartbeat watchdog tick");
}

/// Spawn the three watchdog loops. Each owns its own interval timer so a
/// slow tick in one never delays the others.
pub fn spawn_all(store: Arc<Store>, hub: SessionHub, config: &PushPalsConfig) {
    let tick = Duration::from_millis(config.watchdog_tick_ms.max(1));
    let ttl_ms = config.heartbeat_ttl_ms;
    let max_requeues = config.worker_lost_max_requeues;

    let store_a = store.clone();
    let hub_a = hub.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            queue_wait_budget_tick(&store_a, &hub_a, now_epoch_ms()).await;
        }
    });

    let store_b = store.clone();
    let hub_b = hub.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            execution_budget_tick(&store_b, &hub_b, now_epoch_ms()).await;
        }
    });

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            worker_heartbeat_tick(&store, &hub, now_epoch_ms(), ttl_ms, max_requeues).await;
        }
    });
}

#[cfg(test)]
#[path = "watchdogs_tests.rs"]
mod tests;
