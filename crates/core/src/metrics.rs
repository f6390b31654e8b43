// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record metrics gathered from the controller's per-tick cache.
//!
//! The controller publishes its record slice once per tick; this module
//! reduces that slice to counts the metrics exporter can ship as gauges.

use crate::record::{JobRecord, JobState};
use serde::Serialize;
use std::collections::HashMap;

/// Counts by state, overall and per logical job.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordMetrics {
    pub by_state: HashMap<JobState, usize>,
    pub by_job: HashMap<String, HashMap<JobState, usize>>,
}

impl RecordMetrics {
    /// Count for a state, zero when absent.
    pub fn state_count(&self, state: JobState) -> usize {
        self.by_state.get(&state).copied().unwrap_or(0)
    }
}

/// Reduce a record slice to per-state and per-job counts.
pub fn gather_record_metrics(records: &[JobRecord]) -> RecordMetrics {
    let mut metrics = RecordMetrics::default();
    for record in records {
        *metrics.by_state.entry(record.status.state).or_insert(0) += 1;
        *metrics
            .by_job
            .entry(record.spec.job.clone())
            .or_default()
            .entry(record.status.state)
            .or_insert(0) += 1;
    }
    metrics
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
