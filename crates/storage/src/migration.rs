// SPDX-License-Identifier: MIT

//! Schema migration for on-disk snapshots. A snapshot is `{v, seq, state}`;
//! `v` is the schema version of `state` and is bumped whenever
//! [`crate::state::MaterializedState`]'s shape changes in a way that isn't
//! forward-compatible under serde's own `#[serde(default)]` handling.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MigrationError {
    #[error("snapshot version {0} is newer than the running binary's version {1}")]
    TooNew(u32, u32),
    #[error("no migration path from version {0} to {1}")]
    NoPath(u32, u32),
}

/// One version-to-version step, applied in place to the whole snapshot
/// JSON value (`{v, seq, state}`). Operating on the raw `Value` rather
/// than a typed struct is what lets old snapshots load against a binary
/// whose [`crate::state::MaterializedState`] shape has since changed.
pub trait Migration {
    fn source_version(&self) -> u32;
    fn target_version(&self) -> u32;
    fn migrate(&self, snapshot: &mut Value) -> Result<(), MigrationError>;
}

#[derive(Default)]
pub struct MigrationRegistry {
    pub(crate) migrations: Vec<Box<dyn Migration>>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self {
            migrations: Vec::new(),
        }
    }

    pub fn register(&mut self, migration: Box<dyn Migration>) {
        self.migrations.push(migration);
    }

    /// Walk single-version steps from the snapshot's recorded `v` up to
    /// `target_version`, in order, erroring if the snapshot is from a
    /// future version or no contiguous chain of steps exists.
    pub fn migrate_to(&self, mut snapshot: Value, target_version: u32) -> Result<Value, MigrationError> {
        let current = snapshot
            .get("v")
            .and_then(Value::as_u64)
            .map(|v| v as u32)
            .unwrap_or(0);

        if current > target_version {
            return Err(MigrationError::TooNew(current, target_version));
        }
        if current == target_version {
            return Ok(snapshot);
        }

        let mut version = current;
        while version < target_version {
            let step = self
                .migrations
                .iter()
                .find(|m| m.source_version() == version)
                .ok_or(MigrationError::NoPath(current, target_version))?;
            step.migrate(&mut snapshot)?;
            version = step.target_version();
            snapshot["v"] = Value::from(version);
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
