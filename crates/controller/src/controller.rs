// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller state and the concurrency gate.

use gaffer_adapters::{BuildEngine, RecordStore, Reviewer};
use gaffer_config::{Config, ConfigProvider};
use gaffer_core::{
    gather_record_metrics, Clock, IdGen, JobRecord, JobState, NanoIdGen, RecordMetrics,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Status descriptions written by the state machine drivers.
pub const DESC_ENQUEUED: &str = "Build enqueued.";
pub const DESC_RUNNING: &str = "Build running.";
pub const DESC_SUCCEEDED: &str = "Build succeeded.";
pub const DESC_FAILED: &str = "Build failed.";
pub const DESC_ABORTED: &str = "Build aborted.";
pub const DESC_MISSING_BUILD: &str = "Error finding build.";
pub const DESC_SUBMIT_FAILED: &str = "Error starting build.";

/// Reconciles job records against the build backend.
///
/// Generic over the four external collaborators and the clock so the whole
/// control loop runs against in-memory fakes in tests.
pub struct Controller<S, B, R, P, C> {
    pub(crate) store: S,
    pub(crate) engine: B,
    pub(crate) reviewer: R,
    pub(crate) config: P,
    pub(crate) clock: C,
    /// Label selector applied when listing records
    pub(crate) selector: String,
    /// Names for controller-created follow-up records
    pub(crate) id_gen: Arc<dyn IdGen>,

    /// Short-lived counter limiting build concurrency. Rebuilt from
    /// observed truth every tick; never held across an adapter call.
    pending: Mutex<HashMap<String, u32>>,

    /// Record slice shared with the metrics side-channel.
    cache: RwLock<Vec<JobRecord>>,
}

impl<S, B, R, P, C> Controller<S, B, R, P, C>
where
    S: RecordStore,
    B: BuildEngine,
    R: Reviewer,
    P: ConfigProvider,
    C: Clock,
{
    pub fn new(
        store: S,
        engine: B,
        reviewer: R,
        config: P,
        clock: C,
        selector: impl Into<String>,
    ) -> Self {
        Self {
            store,
            engine,
            reviewer,
            config,
            clock,
            selector: selector.into(),
            id_gen: Arc::new(NanoIdGen),
            pending: Mutex::new(HashMap::new()),
            cache: RwLock::new(Vec::new()),
        }
    }

    /// Replace the record-name generator (deterministic IDs in tests).
    pub fn with_id_gen(mut self, id_gen: Arc<dyn IdGen>) -> Self {
        self.id_gen = id_gen;
        self
    }

    /// Whether the record may start a build now. Admission and the counter
    /// increment happen under one lock; there is no separate reserve step.
    pub(crate) fn can_execute_concurrently(&self, record: &JobRecord, config: &Config) -> bool {
        let mut pending = self.pending.lock();

        if config.max_concurrency > 0 {
            let running: u32 = pending.values().sum();
            if running >= config.max_concurrency {
                debug!(
                    record = %record.name,
                    job = %record.spec.job,
                    running,
                    "not starting another build, global cap reached"
                );
                return false;
            }
        }

        if record.spec.max_concurrency == 0 {
            *pending.entry(record.spec.job.clone()).or_insert(0) += 1;
            return true;
        }

        let count = pending.get(&record.spec.job).copied().unwrap_or(0);
        if count >= record.spec.max_concurrency {
            debug!(
                record = %record.name,
                job = %record.spec.job,
                count,
                "not starting another build of this job, per-job cap reached"
            );
            return false;
        }
        *pending.entry(record.spec.job.clone()).or_insert(0) += 1;
        true
    }

    /// Count one observed pending build for the given job.
    pub(crate) fn increment_pending(&self, job: &str) {
        *self.pending.lock().entry(job.to_string()).or_insert(0) += 1;
    }

    /// Reset the pending counter at the start of a tick.
    pub(crate) fn reset_pending(&self) {
        self.pending.lock().clear();
    }

    /// Publish the tick's record slice for the metrics side-channel.
    pub(crate) fn publish_cache(&self, records: &[JobRecord]) {
        *self.cache.write() = records.to_vec();
    }

    /// Gather metrics from the records published by the last tick.
    ///
    /// Safe to call concurrently with [`sync`](Controller::sync).
    pub fn sync_metrics(&self) -> RecordMetrics {
        gather_record_metrics(&self.cache.read())
    }

    #[cfg(test)]
    pub(crate) fn pending_counts(&self) -> HashMap<String, u32> {
        self.pending.lock().clone()
    }
}

/// Log a state transition once the driver has settled the record.
pub(crate) fn log_transition(record: &JobRecord, prev: JobState) {
    if prev != record.status.state {
        info!(
            record = %record.name,
            job = %record.spec.job,
            from = %prev,
            to = %record.status.state,
            "transitioning states"
        );
    }
}
