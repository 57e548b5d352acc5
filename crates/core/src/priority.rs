// SPDX-License-Identifier: MIT

//! Queue priority levels shared by the request, job, and completion queues.

use serde::{Deserialize, Serialize};

/// Priority of a queued row. Ordered `Interactive > Normal > Background`;
/// the derived `Ord` impl places `Interactive` first so a max-heap or a
/// `sort_by(|a, b| b.priority.cmp(&a.priority))` picks it first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Background,
    Normal,
    Interactive,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Normal
    }
}

crate::simple_display! {
    Priority {
        Background => "background",
        Normal => "normal",
        Interactive => "interactive",
    }
}

#[cfg(test)]
#[path = "priority_tests.rs"]
mod tests;
