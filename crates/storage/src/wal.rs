// SPDX-License-Identifier: MIT

//! Append-only write-ahead log of [`StoreOp`] entries, one line of JSON
//! per entry. Recovery replays a snapshot then every WAL entry whose `seq`
//! is greater than the snapshot's recorded `processed_seq` (spec.md §4.1,
//! §6 "Persisted state").
//!
//! Corrupt or non-UTF-8 tail bytes are treated as a torn write from a
//! crash mid-append: `open` truncates the file back to its last valid
//! entry and rotates the original aside to `.bak` (keeping up to 3 prior
//! rotations) rather than refusing to start.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::state::StoreOp;
use crate::StoreError;

/// Number of appended, unflushed entries at which `needs_flush` starts
/// returning true.
const FLUSH_THRESHOLD: usize = 100;

/// Maximum number of rotated `.bak` generations kept around a corrupt WAL.
const MAX_BAK_GENERATIONS: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub op: StoreOp,
}

pub struct Wal {
    path: PathBuf,
    file: File,
    write_seq: u64,
    processed_seq: u64,
    unflushed_since_last_check: usize,
}

impl Wal {
    /// Open (creating if absent) the WAL at `path`. `processed_seq` is the
    /// sequence number recorded in the last loaded snapshot; entries at or
    /// below it are already reflected in the materialized state and are
    /// skipped by [`Wal::next_unprocessed`]/treated as the floor for
    /// [`Wal::entries_after`].
    pub fn open(path: impl AsRef<Path>, processed_seq: u64) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let write_seq = Self::recover(&path)?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        Ok(Self {
            path,
            file,
            write_seq,
            processed_seq,
            unflushed_since_last_check: 0,
        })
    }

    /// Scan the file for the highest valid, contiguous `seq`, rotating a
    /// corrupt or truncated tail aside to `.bak`. Returns the last valid
    /// `seq` (0 if the file was empty, absent, or entirely corrupt).
    fn recover(path: &Path) -> Result<u64, StoreError> {
        if !path.exists() {
            File::create(path)?;
            return Ok(0);
        }

        let raw = std::fs::read(path)?;
        let text = match std::str::from_utf8(&raw) {
            Ok(s) => s,
            Err(e) => {
                let valid_len = e.valid_up_to();
                return Self::salvage(path, &raw, valid_len);
            }
        };

        let mut good_bytes = 0usize;
        let mut last_seq = 0u64;
        for line in text.split_inclusive('\n') {
            let trimmed = line.trim_end_matches('\n');
            if trimmed.is_empty() {
                good_bytes += line.len();
                continue;
            }
            match serde_json::from_str::<WalEntry>(trimmed) {
                Ok(entry) => {
                    good_bytes += line.len();
                    last_seq = entry.seq;
                }
                Err(_) => break,
            }
        }

        if good_bytes == raw.len() {
            Ok(last_seq)
        } else {
            Self::salvage(path, &raw, good_bytes)
        }
    }

    /// Truncate `path` to its first `good_bytes`, rotating the original
    /// content aside to `.bak` (sliding existing `.bak`/`.bak.N` files up
    /// by one generation, dropping anything past [`MAX_BAK_GENERATIONS`]).
    fn salvage(path: &Path, raw: &[u8], good_bytes: usize) -> Result<u64, StoreError> {
        Self::rotate_bak(path)?;
        std::fs::write(path.with_extension("bak"), raw)?;
        std::fs::write(path, &raw[..good_bytes])?;

        let mut last_seq = 0u64;
        if let Ok(text) = std::str::from_utf8(&raw[..good_bytes]) {
            for line in text.lines() {
                if let Ok(entry) = serde_json::from_str::<WalEntry>(line) {
                    last_seq = entry.seq;
                }
            }
        }
        Ok(last_seq)
    }

    fn rotate_bak(path: &Path) -> Result<(), StoreError> {
        for gen in (1..=MAX_BAK_GENERATIONS).rev() {
            let from = if gen == 1 {
                path.with_extension("bak")
            } else {
                path.with_extension(format!("bak.{gen}"))
            };
            if from.exists() {
                if gen == MAX_BAK_GENERATIONS {
                    std::fs::remove_file(&from)?;
                } else {
                    let to = path.with_extension(format!("bak.{}", gen + 1));
                    std::fs::rename(&from, to)?;
                }
            }
        }
        Ok(())
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    /// Append `op`, assigning the next `seq`. Buffered; call
    /// [`Wal::flush`] to fsync.
    pub fn append(&mut self, op: &StoreOp) -> Result<u64, StoreError> {
        self.write_seq += 1;
        let entry = WalEntry {
            seq: self.write_seq,
            op: op.clone(),
        };
        let line = serde_json::to_string(&entry)
            .map_err(|e| StoreError::Snapshot(format!("wal entry encode: {e}")))?;
        writeln!(self.file, "{line}")?;
        self.unflushed_since_last_check += 1;
        Ok(self.write_seq)
    }

    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.file.flush()?;
        self.file.sync_data()?;
        self.unflushed_since_last_check = 0;
        Ok(())
    }

    pub fn needs_flush(&self) -> bool {
        self.unflushed_since_last_check >= FLUSH_THRESHOLD
    }

    /// Mark `seq` (and everything before it) as reflected in the in-memory
    /// state, advancing the floor used by [`Wal::next_unprocessed`].
    pub fn mark_processed(&mut self, seq: u64) {
        if seq > self.processed_seq {
            self.processed_seq = seq;
        }
    }

    /// Read every syntactically valid entry in the file, skipping (not
    /// stopping at) any malformed or non-UTF-8 line — a torn write from a
    /// crash can land a corrupt line ahead of entries appended since.
    fn read_from(&self, after_seq: u64) -> Result<Vec<WalEntry>, StoreError> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(0))?;
        let reader = BufReader::new(file);
        let mut out = Vec::new();
        for line in reader.lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => continue,
            };
            if line.is_empty() {
                continue;
            }
            if let Ok(entry) = serde_json::from_str::<WalEntry>(&line) {
                if entry.seq > after_seq {
                    out.push(entry);
                }
            }
        }
        Ok(out)
    }

    /// Entries with `seq > after`, in order, skipping any corrupt lines.
    pub fn entries_after(&self, after: u64) -> Result<Vec<WalEntry>, StoreError> {
        self.read_from(after)
    }

    /// The next entry past `processed_seq` that hasn't been returned by a
    /// prior call, or `None` if there is none (or the next line on disk is
    /// malformed — corruption here is not an error, just end-of-stream).
    pub fn next_unprocessed(&mut self) -> Result<Option<WalEntry>, StoreError> {
        let entries = self.read_from(self.processed_seq)?;
        if let Some(entry) = entries.into_iter().find(|e| e.seq == self.processed_seq + 1) {
            self.processed_seq = entry.seq;
            Ok(Some(entry))
        } else {
            Ok(None)
        }
    }

    /// Drop entries with `seq < floor` from the file, called after a
    /// snapshot has been durably written so the WAL doesn't grow without
    /// bound (spec.md §4.1's "periodic snapshot" language).
    pub fn truncate_before(&mut self, floor: u64) -> Result<(), StoreError> {
        let keep = self.read_from(floor.saturating_sub(1))?;
        let mut tmp = Vec::new();
        for entry in &keep {
            let line = serde_json::to_string(entry)
                .map_err(|e| StoreError::Snapshot(format!("wal entry encode: {e}")))?;
            tmp.extend_from_slice(line.as_bytes());
            tmp.push(b'\n');
        }
        std::fs::write(&self.path, &tmp)?;
        self.file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
