// SPDX-License-Identifier: MIT

//! Bounded rolling samples backing the Session Supervisor's SLO rollups
//! (spec.md §4.7): p50/p95 queue-wait and execution duration, success and
//! timeout rates. Generalizes the daemon's single `MetricsHealth` aggregate
//! (`crates/daemon/src/engine/usage_metrics.rs`) into one ring buffer per
//! queue so percentiles are computed without rescanning the whole store.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// How many terminal-transition samples each queue's metrics retain.
const WINDOW: usize = 512;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sample {
    pub queue_wait_ms: u64,
    pub duration_ms: u64,
    pub succeeded: bool,
    pub timed_out: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueMetrics {
    samples: VecDeque<Sample>,
}

impl QueueMetrics {
    pub fn record(&mut self, sample: Sample) {
        if self.samples.len() == WINDOW {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn percentile(&self, pick: impl Fn(&Sample) -> u64, p: f64) -> Option<u64> {
        if self.samples.is_empty() {
            return None;
        }
        let mut values: Vec<u64> = self.samples.iter().map(pick).collect();
        values.sort_unstable();
        let rank = ((values.len() - 1) as f64 * p).round() as usize;
        values.get(rank).copied()
    }

    pub fn queue_wait_p50_ms(&self) -> Option<u64> {
        self.percentile(|s| s.queue_wait_ms, 0.50)
    }

    pub fn queue_wait_p95_ms(&self) -> Option<u64> {
        self.percentile(|s| s.queue_wait_ms, 0.95)
    }

    pub fn duration_p50_ms(&self) -> Option<u64> {
        self.percentile(|s| s.duration_ms, 0.50)
    }

    pub fn duration_p95_ms(&self) -> Option<u64> {
        self.percentile(|s| s.duration_ms, 0.95)
    }

    pub fn success_rate(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let ok = self.samples.iter().filter(|s| s.succeeded).count();
        Some(ok as f64 / self.samples.len() as f64)
    }

    pub fn timeout_rate(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let timed_out = self.samples.iter().filter(|s| s.timed_out).count();
        Some(timed_out as f64 / self.samples.len() as f64)
    }

    pub fn snapshot(&self) -> QueueMetricsSnapshot {
        QueueMetricsSnapshot {
            sample_count: self.len(),
            queue_wait_p50_ms: self.queue_wait_p50_ms(),
            queue_wait_p95_ms: self.queue_wait_p95_ms(),
            duration_p50_ms: self.duration_p50_ms(),
            duration_p95_ms: self.duration_p95_ms(),
            success_rate: self.success_rate(),
            timeout_rate: self.timeout_rate(),
        }
    }
}

/// A read-only rollup of one queue's recent terminal-transition samples,
/// exposed by the Session Supervisor's `/system/status` endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct QueueMetricsSnapshot {
    pub sample_count: usize,
    pub queue_wait_p50_ms: Option<u64>,
    pub queue_wait_p95_ms: Option<u64>,
    pub duration_p50_ms: Option<u64>,
    pub duration_p95_ms: Option<u64>,
    pub success_rate: Option<f64>,
    pub timeout_rate: Option<f64>,
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
