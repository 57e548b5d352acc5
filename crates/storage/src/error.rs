// SPDX-License-Identifier: MIT

//! Store-boundary failures. Every public `Store` method returns
//! `Result<_, StoreError>`; callers in `pushpals-server` map these onto
//! [`pushpals_core::ErrorClass`] for the wire response.

use pushpals_core::ErrorClass;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no such {kind}: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} {id} is not in state {expected}: actually {actual}")]
    Conflict {
        kind: &'static str,
        id: String,
        expected: &'static str,
        actual: String,
    },

    #[error("wal io error: {0}")]
    WalIo(#[from] std::io::Error),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("migration error: {0}")]
    Migration(#[from] crate::migration::MigrationError),
}

impl StoreError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::Conflict { .. } => ErrorClass::Conflict,
            Self::WalIo(_) | Self::Snapshot(_) | Self::Migration(_) => ErrorClass::Internal,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
