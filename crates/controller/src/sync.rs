// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The reconciliation tick and its worker pool.

use crate::controller::Controller;
use crate::error::{SyncError, TickError};
use crate::report;
use futures_util::future;
use gaffer_adapters::{BuildEngine, RecordStore, Reviewer};
use gaffer_config::{Config, ConfigProvider};
use gaffer_core::{BuildSnapshot, Clock, JobRecord, JobState, JENKINS_AGENT};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::warn;

/// Which state-machine branch a worker pool applies.
#[derive(Clone, Copy)]
enum Phase {
    Pending,
    NonPending,
}

impl<S, B, R, P, C> Controller<S, B, R, P, C>
where
    S: RecordStore,
    B: BuildEngine,
    R: Reviewer,
    P: ConfigProvider,
    C: Clock,
{
    /// Run one reconciliation tick.
    ///
    /// Idempotent in the steady state: a second tick over unchanged external
    /// state performs no further writes. Returns an aggregate error when any
    /// record failed to sync or report; a failed listing aborts the tick
    /// before any mutation.
    pub async fn sync(&self) -> Result<(), TickError> {
        let config = self.config.snapshot();

        let records = self.store.list(&self.selector).await.map_err(TickError::ListRecords)?;
        let mut records: Vec<JobRecord> =
            records.into_iter().filter(|r| r.spec.agent == JENKINS_AGENT).collect();

        let builds = self
            .engine
            .list(&active_job_names(&records))
            .await
            .map_err(TickError::ListBuilds)?;

        let mut sync_errors = Vec::new();
        if let Err(err) = self.terminate_dupes(&mut records, &builds, &config).await {
            sync_errors.push(err);
        }

        // Share what we have for gathering metrics.
        self.publish_cache(&records);

        // Rebuilt from observed truth every tick instead of being kept in
        // sync with the state of the world incrementally.
        self.reset_pending();

        let (pending, non_pending): (Vec<_>, Vec<_>) =
            records.into_iter().partition(|r| r.status.state == JobState::Pending);

        // Sync pending records first so running work is counted before the
        // concurrency gate admits anything fresh.
        let mut reports = Vec::new();
        let (mut phase_reports, mut phase_errors) =
            self.run_phase(Phase::Pending, pending, &builds, &config).await;
        reports.append(&mut phase_reports);
        sync_errors.append(&mut phase_errors);

        let (mut phase_reports, mut phase_errors) =
            self.run_phase(Phase::NonPending, non_pending, &builds, &config).await;
        reports.append(&mut phase_reports);
        sync_errors.append(&mut phase_errors);

        let mut report_errors = Vec::new();
        for record in &reports {
            if let Err(err) = report::report(&self.reviewer, &config, record).await {
                warn!(record = %record.name, error = %err, "reporting failed");
                report_errors.push(err);
            }
        }

        if sync_errors.is_empty() && report_errors.is_empty() {
            return Ok(());
        }
        Err(TickError::Failures { sync: sync_errors, report: report_errors })
    }

    /// Drain `records` through up to `max_workers` concurrent drivers.
    ///
    /// Workers claim records off a shared cursor until the queue is empty;
    /// the pool returns only when every worker has finished. A driver
    /// failure surfaces as an error without cancelling the other workers.
    async fn run_phase(
        &self,
        phase: Phase,
        records: Vec<JobRecord>,
        builds: &HashMap<String, BuildSnapshot>,
        config: &Config,
    ) -> (Vec<JobRecord>, Vec<SyncError>) {
        let (report_tx, mut report_rx) = mpsc::unbounded_channel();
        let next = AtomicUsize::new(0);
        let records = &records;
        let next = &next;

        let worker_errors = future::join_all((0..config.max_workers.max(1)).map(|_| {
            let report_tx = report_tx.clone();
            async move {
                let mut errors = Vec::new();
                loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(record) = records.get(index) else { break };
                    let result = match phase {
                        Phase::Pending => {
                            self.sync_pending(record.clone(), builds, config, &report_tx).await
                        }
                        Phase::NonPending => {
                            self.sync_non_pending(record.clone(), builds, config, &report_tx).await
                        }
                    };
                    if let Err(err) = result {
                        errors.push(err);
                    }
                }
                errors
            }
        }))
        .await;
        drop(report_tx);

        let mut reports = Vec::new();
        while let Ok(record) = report_rx.try_recv() {
            reports.push(record);
        }
        (reports, worker_errors.into_iter().flatten().collect())
    }
}

/// Distinct logical job names across records that are not complete, sorted
/// so the backend sees a stable request.
pub(crate) fn active_job_names(records: &[JobRecord]) -> Vec<String> {
    let jobs: HashSet<&str> = records
        .iter()
        .filter(|record| !record.complete())
        .map(|record| record.spec.job.as_str())
        .collect();
    let mut jobs: Vec<String> = jobs.into_iter().map(String::from).collect();
    jobs.sort();
    jobs
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
