// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Non-pending branch of the state machine: fresh records awaiting a build.

use crate::controller::{log_transition, Controller, DESC_ENQUEUED, DESC_SUBMIT_FAILED};
use crate::error::SyncError;
use gaffer_adapters::{BuildEngine, RecordStore, Reviewer};
use gaffer_config::{Config, ConfigProvider};
use gaffer_core::{BuildSnapshot, Clock, JobRecord, JobState};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::warn;

impl<S, B, R, P, C> Controller<S, B, R, P, C>
where
    S: RecordStore,
    B: BuildEngine,
    R: Reviewer,
    P: ConfigProvider,
    C: Clock,
{
    /// Submit a build for a record that has none, or hand an already-running
    /// build over to the pending branch.
    ///
    /// Complete records are left untouched. Records denied by the
    /// concurrency gate return without a write or a report and are retried
    /// next tick.
    pub(crate) async fn sync_non_pending(
        &self,
        mut record: JobRecord,
        builds: &HashMap<String, BuildSnapshot>,
        config: &Config,
        reports: &mpsc::UnboundedSender<JobRecord>,
    ) -> Result<(), SyncError> {
        if record.complete() {
            return Ok(());
        }

        let prev_state = record.status.state;

        if !builds.contains_key(&record.name) {
            // Do not start more builds than configured.
            if !self.can_execute_concurrently(&record, config) {
                return Ok(());
            }
            match self.engine.submit(&record).await {
                Ok(()) => {
                    record.status.state = JobState::Pending;
                    record.status.description = DESC_ENQUEUED.to_string();
                }
                Err(err) => {
                    warn!(
                        record = %record.name,
                        job = %record.spec.job,
                        error = %err,
                        "cannot start build"
                    );
                    record.status.completion_ms = Some(self.clock.epoch_ms());
                    record.status.state = JobState::Error;
                    record.status.url = config.support_url.clone();
                    record.status.description = DESC_SUBMIT_FAILED.to_string();
                }
            }
        } else {
            // A build already exists for this record; advance to pending and
            // let the pending branch take it from the next tick.
            record.status.state = JobState::Pending;
            record.status.description = DESC_ENQUEUED.to_string();
        }

        reports.send(record.clone()).ok();
        log_transition(&record, prev_state);
        self.store
            .replace(&record.name, record.clone())
            .await
            .map_err(|source| SyncError::Replace { record: record.name.clone(), source })?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "activation_tests.rs"]
mod tests;
