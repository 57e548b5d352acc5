// SPDX-License-Identifier: MIT

//! Durable storage for the session/event server: an append-only WAL of
//! [`state::StoreOp`] entries, periodic snapshots, and the pure
//! `apply(state, op)` functions that rebuild [`state::MaterializedState`]
//! from them (spec.md §4.1, §6 "Persisted state").

mod error;
mod metrics;
mod migration;
mod pending_index;
mod snapshot;
mod state;
mod store;
mod wal;

pub use error::StoreError;
pub use metrics::{QueueMetrics, QueueMetricsSnapshot};
pub use migration::{Migration, MigrationError, MigrationRegistry};
pub use pending_index::PendingIndex;
pub use snapshot::{Checkpointer, Snapshot, CURRENT_SNAPSHOT_VERSION};
pub use state::{MaterializedState, StoreOp};
pub use store::Store;
pub use wal::{Wal, WalEntry};
