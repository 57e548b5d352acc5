// SPDX-License-Identifier: MIT

//! A claim-order index shared by the request, job, and completion queues
//! (spec.md §4.3): all three share the identical `pending -> claimed ->
//! {completed | failed}` state machine and claim tie-break (priority desc,
//! `enqueuedAt` asc, `id` asc), differing only in row payload and in what
//! "claimer" means — so rather than copy the daemon's per-queue claim scan
//! three times, one generic sorted index backs all three.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use pushpals_core::Priority;

/// Ordered key for a pending row: highest priority first, then oldest
/// `enqueuedAt`, then lexicographically smallest id, matching spec.md
/// §4.3's tie-break exactly. Ids are compared by their string form rather
/// than requiring `Id: Ord` — the server's id newtypes only promise
/// `AsRef<str>`.
#[derive(Debug, Clone)]
struct ClaimKey<Id> {
    priority: Reverse<Priority>,
    enqueued_at_epoch_ms: u64,
    id_str: String,
    id: Id,
}

impl<Id> ClaimKey<Id> {
    fn sort_key(&self) -> (Reverse<Priority>, u64, &str) {
        (self.priority, self.enqueued_at_epoch_ms, self.id_str.as_str())
    }
}

impl<Id> PartialEq for ClaimKey<Id> {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl<Id> Eq for ClaimKey<Id> {}

impl<Id> PartialOrd for ClaimKey<Id> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<Id> Ord for ClaimKey<Id> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// A priority-bucketed FIFO index over a queue's `pending` rows,
/// maintained incrementally on enqueue/claim/requeue rather than rebuilt
/// by scanning the full row table on every claim.
#[derive(Debug, Clone)]
pub struct PendingIndex<Id> {
    keys: BTreeSet<ClaimKey<Id>>,
}

impl<Id: Clone + AsRef<str> + Eq> Default for PendingIndex<Id> {
    fn default() -> Self {
        Self {
            keys: BTreeSet::new(),
        }
    }
}

impl<Id: Clone + AsRef<str> + Eq> PendingIndex<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: Id, priority: Priority, enqueued_at_epoch_ms: u64) {
        let id_str = id.as_ref().to_string();
        self.keys.insert(ClaimKey {
            priority: Reverse(priority),
            enqueued_at_epoch_ms,
            id_str,
            id,
        });
    }

    pub fn remove(&mut self, id: &Id, priority: Priority, enqueued_at_epoch_ms: u64) {
        let id_str = id.as_ref().to_string();
        self.keys.remove(&ClaimKey {
            priority: Reverse(priority),
            enqueued_at_epoch_ms,
            id_str,
            id: id.clone(),
        });
    }

    /// The id the next claim should pick, without removing it — the caller
    /// removes via [`PendingIndex::remove`] once the claim transition has
    /// actually been applied to the row (so a failed CAS doesn't desync
    /// the index from `MaterializedState`).
    pub fn peek(&self) -> Option<&Id> {
        self.keys.iter().next().map(|k| &k.id)
    }

    /// All pending ids in claim order (priority desc, `enqueuedAt` asc, id
    /// asc) — used by callers that need to scan past the head, e.g. the job
    /// queue's `targetWorkerId` preference (spec.md §4.3).
    pub fn iter(&self) -> impl Iterator<Item = &Id> {
        self.keys.iter().map(|k| &k.id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
#[path = "pending_index_tests.rs"]
mod tests;
