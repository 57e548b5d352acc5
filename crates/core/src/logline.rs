// SPDX-License-Identifier: MIT

//! Per-job log line stream.

use crate::job::JobId;
use serde::{Deserialize, Serialize};

/// Stream a log line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStream {
    Stdout,
    Stderr,
}

crate::simple_display! {
    LogStream {
        Stdout => "stdout",
        Stderr => "stderr",
    }
}

/// One line of a job's ordered log stream. `seq` is producer-assigned and
/// unique within `(job_id, stream)`; consumers sort by `seq` to recover a
/// gap-free sequence starting at 1 (spec.md §3, §8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLine {
    pub job_id: JobId,
    pub seq: u64,
    pub stream: LogStream,
    pub line: String,
    pub recorded_at_epoch_ms: u64,
}

#[cfg(test)]
#[path = "logline_tests.rs"]
mod tests;
