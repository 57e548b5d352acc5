// SPDX-License-Identifier: MIT

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::priority::Priority;
    use crate::queue_item::{CompletionStatus, QueueItemStatus};
    use proptest::prelude::*;

    pub fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::Interactive),
            Just(Priority::Normal),
            Just(Priority::Background),
        ]
    }

    pub fn arb_queue_item_status() -> impl Strategy<Value = QueueItemStatus> {
        prop_oneof![
            Just(QueueItemStatus::Pending),
            Just(QueueItemStatus::Claimed),
            Just(QueueItemStatus::Completed),
            Just(QueueItemStatus::Failed),
        ]
    }

    pub fn arb_completion_status() -> impl Strategy<Value = CompletionStatus> {
        prop_oneof![
            Just(CompletionStatus::Pending),
            Just(CompletionStatus::Claimed),
            Just(CompletionStatus::Processed),
            Just(CompletionStatus::Failed),
        ]
    }
}
