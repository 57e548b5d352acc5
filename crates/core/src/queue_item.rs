// SPDX-License-Identifier: MIT

//! Status shared by the three queues (requests, jobs share one shape;
//! completions add a `processed` terminal state instead of `completed`).

use serde::{Deserialize, Serialize};

/// Status of a request or job row. Lifecycle: `pending -> claimed ->
/// (completed | failed)`; terminal states are sticky (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueItemStatus {
    Pending,
    Claimed,
    Completed,
    Failed,
}

impl QueueItemStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

crate::simple_display! {
    QueueItemStatus {
        Pending => "pending",
        Claimed => "claimed",
        Completed => "completed",
        Failed => "failed",
    }
}

/// Status of a completion row. Same shape as [`QueueItemStatus`] but the
/// non-failure terminal state is `processed`, not `completed` (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Pending,
    Claimed,
    Processed,
    Failed,
}

impl CompletionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Processed | Self::Failed)
    }
}

crate::simple_display! {
    CompletionStatus {
        Pending => "pending",
        Claimed => "claimed",
        Processed => "processed",
        Failed => "failed",
    }
}

#[cfg(test)]
#[path = "queue_item_tests.rs"]
mod tests;
