// SPDX-License-Identifier: MIT

//! Snapshot persistence for crash recovery. A snapshot stores the complete
//! materialized state at a point in time, identified by the WAL sequence
//! number it was taken at; recovery loads the newest snapshot and replays
//! WAL entries after that sequence (spec.md §4.1, §6 "Persisted state").

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::migration::MigrationRegistry;
use crate::state::MaterializedState;
use crate::StoreError;

/// Current snapshot schema version. Bump and add a [`crate::migration::Migration`]
/// step whenever `MaterializedState`'s shape changes incompatibly.
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

const MAX_BAK_FILES: u32 = 3;

/// On-disk snapshot body. Written as zstd-compressed JSON with a leading
/// 32-byte SHA-256 checksum of the compressed payload, so a torn write is
/// detected rather than silently loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "v")]
    pub version: u32,
    pub seq: u64,
    pub state: MaterializedState,
    pub created_at: DateTime<Utc>,
}

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
/// Keeps up to [`MAX_BAK_FILES`] generations, dropping the oldest.
fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }
    bak(1)
}

/// Writes and loads snapshots at a fixed path, handling compression,
/// checksumming, and `.bak` rotation of the previous snapshot.
pub struct Checkpointer {
    path: PathBuf,
}

impl Checkpointer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Serialize, compress, checksum, and atomically replace the snapshot
    /// file, rotating the previous file aside to `.bak` first.
    pub fn write(&self, state: &MaterializedState, seq: u64) -> Result<(), StoreError> {
        let snapshot = Snapshot {
            version: CURRENT_SNAPSHOT_VERSION,
            seq,
            state: state.clone(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_vec(&snapshot)
            .map_err(|e| StoreError::Snapshot(format!("encode: {e}")))?;
        let compressed =
            zstd::encode_all(&json[..], 0).map_err(|e| StoreError::Snapshot(format!("compress: {e}")))?;

        let mut payload = Sha256::digest(&compressed).to_vec();
        payload.extend_from_slice(&compressed);

        if self.path.exists() {
            let bak = rotate_bak_path(&self.path);
            fs::rename(&self.path, bak)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &payload)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Load the snapshot, verifying its checksum and migrating it to
    /// [`CURRENT_SNAPSHOT_VERSION`] if it was written by an older binary.
    /// Returns `Ok(None)` if no snapshot file exists yet.
    pub fn load(&self, migrations: &MigrationRegistry) -> Result<Option<Snapshot>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let payload = fs::read(&self.path)?;
        if payload.len() < 32 {
            return Err(StoreError::Snapshot("snapshot file too short".into()));
        }
        let (checksum, compressed) = payload.split_at(32);
        let actual = Sha256::digest(compressed);
        if actual.as_slice() != checksum {
            return Err(StoreError::Snapshot("snapshot checksum mismatch".into()));
        }

        let json = zstd::decode_all(compressed)
            .map_err(|e| StoreError::Snapshot(format!("decompress: {e}")))?;
        let value: serde_json::Value = serde_json::from_slice(&json)
            .map_err(|e| StoreError::Snapshot(format!("decode: {e}")))?;
        let migrated = migrations.migrate_to(value, CURRENT_SNAPSHOT_VERSION)?;
        let snapshot: Snapshot = serde_json::from_value(migrated)
            .map_err(|e| StoreError::Snapshot(format!("decode after migration: {e}")))?;
        Ok(Some(snapshot))
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
