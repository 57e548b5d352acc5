// SPDX-License-Identifier: MIT

//! The durable store: a single lock guarding the WAL and the materialized
//! state it backs, so every mutation is append-then-apply under one
//! critical section (spec.md §4.1's "WAL is the source of truth").

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use pushpals_core::{
    Completion, CompletionId, Event, Job, JobId, LogLine, Priority, PositionedEvent, Request,
    RequestId, Session, SessionId, WorkerId, WorkerRecord,
};

use crate::metrics::QueueMetricsSnapshot;
use crate::migration::MigrationRegistry;
use crate::snapshot::Checkpointer;
use crate::state::{MaterializedState, StoreOp};
use crate::wal::Wal;
use crate::StoreError;

/// Number of applied WAL entries between automatic snapshots.
const SNAPSHOT_INTERVAL: u64 = 1000;

/// Pick the job the next claim should take, honoring spec.md §4.3's
/// `targetWorkerId` preference: within each priority tier (highest first),
/// a job targeted at `worker_id` wins over an untargeted FIFO pick, and a
/// job targeted at a *different* worker is never eligible at all.
fn select_job_to_claim(state: &MaterializedState, worker_id: &WorkerId) -> Option<JobId> {
    let mut tier: Option<Priority> = None;
    let mut targeted: Option<JobId> = None;
    let mut untargeted: Option<JobId> = None;

    for id in state.jobs_pending.iter() {
        let Some(job) = state.jobs.get(id) else {
            continue;
        };
        if tier != Some(job.priority) {
            if let Some(chosen) = targeted.or(untargeted) {
                return Some(chosen);
            }
            tier = Some(job.priority);
            targeted = None;
            untargeted = None;
        }
        match &job.target_worker_id {
            Some(target) if target == worker_id => {
                if targeted.is_none() {
                    targeted = Some(*id);
                }
            }
            Some(_) => {}
            None => {
                if untargeted.is_none() {
                    untargeted = Some(*id);
                }
            }
        }
    }
    targeted.or(untargeted)
}

struct Inner {
    wal: Wal,
    state: MaterializedState,
    seq_at_last_snapshot: u64,
}

/// The session/event server's durable store. Cheap to clone (an `Arc`
/// internally would be the caller's job); `Store` itself owns its lock.
pub struct Store {
    inner: Mutex<Inner>,
    checkpointer: Checkpointer,
    migrations: MigrationRegistry,
    wal_path: PathBuf,
}

impl Store {
    /// Recover from `dir/snapshot.bin` + `dir/wal.log`: load the latest
    /// snapshot (if any), open the WAL at its `processed_seq`, and replay
    /// every entry after that point (spec.md §4.1, §6).
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let snapshot_path = dir.join("snapshot.bin");
        let wal_path = dir.join("wal.log");

        let migrations = MigrationRegistry::new();
        let checkpointer = Checkpointer::new(&snapshot_path);

        let (mut state, processed_seq) = match checkpointer.load(&migrations)? {
            Some(snapshot) => (snapshot.state, snapshot.seq),
            None => (MaterializedState::default(), 0),
        };

        let wal = Wal::open(&wal_path, processed_seq)?;
        for entry in wal.entries_after(processed_seq)? {
            state.apply(&entry.op)?;
        }

        Ok(Self {
            inner: Mutex::new(Inner {
                wal,
                state,
                seq_at_last_snapshot: processed_seq,
            }),
            checkpointer,
            migrations,
            wal_path,
        })
    }

    /// Append `op` to the WAL, apply it to the materialized state, and
    /// flush once the WAL's buffered-write threshold is crossed. Taking a
    /// snapshot is the caller's responsibility via [`Store::maybe_snapshot`]
    /// — keeping it out of the hot path avoids compressing on every write.
    fn commit(&self, op: StoreOp) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock();
        let seq = inner.wal.append(&op)?;
        inner.state.apply(&op)?;
        if inner.wal.needs_flush() {
            inner.wal.flush()?;
        }
        Ok(seq)
    }

    /// Write a snapshot and truncate the WAL up to it if more than
    /// [`SNAPSHOT_INTERVAL`] entries have been applied since the last one.
    /// Intended to be called periodically by a background task, not after
    /// every mutation.
    pub fn maybe_snapshot(&self) -> Result<(), StoreError> {
        let (state, seq, due) = {
            let inner = self.inner.lock();
            let seq = inner.wal.write_seq();
            let due = seq.saturating_sub(inner.seq_at_last_snapshot) >= SNAPSHOT_INTERVAL;
            (inner.state.clone(), seq, due)
        };
        if !due {
            return Ok(());
        }
        self.checkpointer.write(&state, seq)?;
        let mut inner = self.inner.lock();
        inner.wal.truncate_before(seq + 1)?;
        inner.seq_at_last_snapshot = seq;
        Ok(())
    }

    pub fn wal_path(&self) -> &Path {
        &self.wal_path
    }

    // -- sessions --------------------------------------------------------

    pub fn create_session(&self, id: SessionId, at_epoch_ms: u64) -> Result<(), StoreError> {
        self.commit(StoreOp::CreateSession { id, at_epoch_ms }).map(|_| ())
    }

    pub fn touch_session(&self, id: SessionId, at_epoch_ms: u64) -> Result<(), StoreError> {
        self.commit(StoreOp::TouchSession { id, at_epoch_ms }).map(|_| ())
    }

    pub fn get_session(&self, id: &SessionId) -> Option<Session> {
        self.inner.lock().state.sessions.get(id).cloned()
    }

    // -- events ------------------------------------------------------------

    pub fn append_event(&self, envelope: Event) -> Result<u64, StoreError> {
        // Cursor assignment and commit happen under the same lock acquisition
        // so two concurrent appends to the same session can't race onto the
        // same cursor value.
        let mut inner = self.inner.lock();
        let cursor = inner
            .state
            .events
            .get(&envelope.session_id)
            .map(|v| v.len() as u64 + 1)
            .unwrap_or(1);
        let op = StoreOp::AppendEvent {
            envelope: Box::new(envelope),
            cursor,
        };
        inner.wal.append(&op)?;
        inner.state.apply(&op)?;
        if inner.wal.needs_flush() {
            inner.wal.flush()?;
        }
        Ok(cursor)
    }

    pub fn events_after(&self, session_id: &SessionId, after_cursor: u64) -> Vec<PositionedEvent> {
        self.inner
            .lock()
            .state
            .events
            .get(session_id)
            .map(|events| {
                events
                    .iter()
                    .filter(|e| e.cursor > after_cursor)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    // -- requests ----------------------------------------------------------

    /// Enqueue `request`, or — if it carries an `idempotency_key` already
    /// seen on a prior enqueue — return the existing row's id instead of
    /// writing a duplicate (spec.md §3).
    pub fn enqueue_request(&self, request: Request) -> Result<RequestId, StoreError> {
        let mut inner = self.inner.lock();
        if let Some(key) = &request.idempotency_key {
            if let Some(existing) = inner.state.request_idempotency.get(key) {
                return Ok(*existing);
            }
        }
        let id = request.id;
        let op = StoreOp::EnqueueRequest {
            request: Box::new(request),
        };
        inner.wal.append(&op)?;
        inner.state.apply(&op)?;
        if inner.wal.needs_flush() {
            inner.wal.flush()?;
        }
        Ok(id)
    }

    pub fn claim_next_request(&self, agent_id: &str, at_epoch_ms: u64) -> Result<Option<Request>, StoreError> {
        let mut inner = self.inner.lock();
        let Some(id) = inner.state.requests_pending.peek().copied() else {
            return Ok(None);
        };
        let op = StoreOp::ClaimRequest {
            id,
            agent_id: agent_id.to_string(),
            at_epoch_ms,
        };
        inner.wal.append(&op)?;
        inner.state.apply(&op)?;
        if inner.wal.needs_flush() {
            inner.wal.flush()?;
        }
        Ok(inner.state.requests.get(&id).cloned())
    }

    pub fn complete_request(
        &self,
        id: RequestId,
        result: serde_json::Value,
        at_epoch_ms: u64,
    ) -> Result<(), StoreError> {
        self.commit(StoreOp::CompleteRequest { id, result, at_epoch_ms }).map(|_| ())
    }

    pub fn fail_request(
        &self,
        id: RequestId,
        message: String,
        detail: Option<serde_json::Value>,
        at_epoch_ms: u64,
    ) -> Result<(), StoreError> {
        self.commit(StoreOp::FailRequest { id, message, detail, at_epoch_ms }).map(|_| ())
    }

    pub fn get_request(&self, id: &RequestId) -> Option<Request> {
        self.inner.lock().state.requests.get(id).cloned()
    }

    pub fn requests_with_priority(&self, priority: Priority) -> usize {
        self.inner.lock().state.requests_with_priority(priority)
    }

    /// All requests, for the Session Supervisor's `GET /requests` listing.
    /// Not paginated — callers render from a single consistent snapshot
    /// rather than holding the lock open across a streamed response.
    pub fn list_requests(&self) -> Vec<Request> {
        self.inner.lock().state.requests.values().cloned().collect()
    }

    pub fn request_metrics_snapshot(&self) -> QueueMetricsSnapshot {
        self.inner.lock().state.request_metrics.snapshot()
    }

    // -- jobs ----------------------------------------------------------------

    /// Enqueue `job`, or — if it carries an `idempotency_key` already seen
    /// on a prior enqueue — return the existing row's id instead of writing
    /// a duplicate (spec.md §3).
    pub fn enqueue_job(&self, job: Job) -> Result<JobId, StoreError> {
        let mut inner = self.inner.lock();
        if let Some(key) = &job.idempotency_key {
            if let Some(existing) = inner.state.job_idempotency.get(key) {
                return Ok(*existing);
            }
        }
        let id = job.id;
        let op = StoreOp::EnqueueJob { job: Box::new(job) };
        inner.wal.append(&op)?;
        inner.state.apply(&op)?;
        if inner.wal.needs_flush() {
            inner.wal.flush()?;
        }
        Ok(id)
    }

    pub fn claim_next_job(&self, worker_id: &WorkerId, at_epoch_ms: u64) -> Result<Option<Job>, StoreError> {
        let mut inner = self.inner.lock();
        let Some(id) = select_job_to_claim(&inner.state, worker_id) else {
            return Ok(None);
        };
        let op = StoreOp::ClaimJob {
            id,
            worker_id: worker_id.clone(),
            at_epoch_ms,
        };
        inner.wal.append(&op)?;
        inner.state.apply(&op)?;
        if inner.wal.needs_flush() {
            inner.wal.flush()?;
        }
        Ok(inner.state.jobs.get(&id).cloned())
    }

    pub fn requeue_job(&self, id: JobId, at_epoch_ms: u64) -> Result<(), StoreError> {
        self.commit(StoreOp::RequeueJob { id, at_epoch_ms }).map(|_| ())
    }

    pub fn complete_job(
        &self,
        id: JobId,
        result: Option<serde_json::Value>,
        at_epoch_ms: u64,
    ) -> Result<(), StoreError> {
        self.commit(StoreOp::CompleteJob { id, result, at_epoch_ms }).map(|_| ())
    }

    pub fn fail_job(
        &self,
        id: JobId,
        message: String,
        detail: Option<serde_json::Value>,
        at_epoch_ms: u64,
    ) -> Result<(), StoreError> {
        self.commit(StoreOp::FailJob { id, message, detail, at_epoch_ms }).map(|_| ())
    }

    pub fn append_job_log(&self, line: LogLine) -> Result<(), StoreError> {
        self.commit(StoreOp::AppendJobLog { line: Box::new(line) }).map(|_| ())
    }

    pub fn get_job(&self, id: &JobId) -> Option<Job> {
        self.inner.lock().state.jobs.get(id).cloned()
    }

    pub fn job_logs(&self, id: &JobId) -> Vec<LogLine> {
        self.inner.lock().state.logs.get(id).cloned().unwrap_or_default()
    }

    pub fn active_job_count(&self, worker_id: &WorkerId) -> u64 {
        self.inner.lock().state.active_job_count(worker_id)
    }

    /// All jobs, for the Session Supervisor's `GET /jobs` listing and for
    /// the watchdogs to scan for budget/heartbeat violations.
    pub fn list_jobs(&self) -> Vec<Job> {
        self.inner.lock().state.jobs.values().cloned().collect()
    }

    pub fn job_metrics_snapshot(&self) -> QueueMetricsSnapshot {
        self.inner.lock().state.job_metrics.snapshot()
    }

    // -- completions -----------------------------------------------------

    /// Enqueue `completion`, or — if it carries an `idempotency_key` already
    /// seen on a prior enqueue — return the existing row's id instead of
    /// writing a duplicate (spec.md §3).
    pub fn enqueue_completion(&self, completion: Completion) -> Result<CompletionId, StoreError> {
        let mut inner = self.inner.lock();
        if let Some(key) = &completion.idempotency_key {
            if let Some(existing) = inner.state.completion_idempotency.get(key) {
                return Ok(*existing);
            }
        }
        let id = completion.id;
        let op = StoreOp::EnqueueCompletion {
            completion: Box::new(completion),
        };
        inner.wal.append(&op)?;
        inner.state.apply(&op)?;
        if inner.wal.needs_flush() {
            inner.wal.flush()?;
        }
        Ok(id)
    }

    pub fn claim_next_completion(
        &self,
        pusher_id: &str,
        at_epoch_ms: u64,
    ) -> Result<Option<Completion>, StoreError> {
        let mut inner = self.inner.lock();
        let Some(id) = inner.state.completions_pending.peek().copied() else {
            return Ok(None);
        };
        let op = StoreOp::ClaimCompletion {
            id,
            pusher_id: pusher_id.to_string(),
            at_epoch_ms,
        };
        inner.wal.append(&op)?;
        inner.state.apply(&op)?;
        if inner.wal.needs_flush() {
            inner.wal.flush()?;
        }
        Ok(inner.state.completions.get(&id).cloned())
    }

    pub fn complete_completion(&self, id: CompletionId, at_epoch_ms: u64) -> Result<(), StoreError> {
        self.commit(StoreOp::CompleteCompletion { id, at_epoch_ms }).map(|_| ())
    }

    pub fn fail_completion(
        &self,
        id: CompletionId,
        message: String,
        detail: Option<serde_json::Value>,
        at_epoch_ms: u64,
    ) -> Result<(), StoreError> {
        self.commit(StoreOp::FailCompletion { id, message, detail, at_epoch_ms }).map(|_| ())
    }

    pub fn list_completions(&self) -> Vec<Completion> {
        self.inner.lock().state.completions.values().cloned().collect()
    }

    pub fn completion_metrics_snapshot(&self) -> QueueMetricsSnapshot {
        self.inner.lock().state.completion_metrics.snapshot()
    }

    // -- workers -----------------------------------------------------------

    pub fn upsert_worker(&self, record: WorkerRecord) -> Result<(), StoreError> {
        self.commit(StoreOp::UpsertWorker {
            record: Box::new(record),
        })
        .map(|_| ())
    }

    pub fn get_worker(&self, id: &WorkerId) -> Option<WorkerRecord> {
        self.inner.lock().state.workers.get(id).cloned()
    }

    pub fn list_workers(&self) -> Vec<WorkerRecord> {
        self.inner.lock().state.workers.values().cloned().collect()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
