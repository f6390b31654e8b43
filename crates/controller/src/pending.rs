// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pending branch of the state machine: records with a build in flight.

use crate::controller::{
    log_transition, Controller, DESC_ABORTED, DESC_FAILED, DESC_MISSING_BUILD, DESC_RUNNING,
    DESC_SUCCEEDED,
};
use crate::error::SyncError;
use gaffer_adapters::{BuildEngine, RecordStore, Reviewer};
use gaffer_config::{render_record, Config, ConfigProvider};
use gaffer_core::{BuildSnapshot, Clock, JobRecord, JobState};
use std::collections::HashMap;
use tokio::sync::mpsc;

impl<S, B, R, P, C> Controller<S, B, R, P, C>
where
    S: RecordStore,
    B: BuildEngine,
    R: Reviewer,
    P: ConfigProvider,
    C: Clock,
{
    /// Advance a pending record one step based on its build snapshot.
    ///
    /// Enqueued builds and unchanged running builds return early without a
    /// write or a report; every other branch reports the record and
    /// persists it.
    pub(crate) async fn sync_pending(
        &self,
        mut record: JobRecord,
        builds: &HashMap<String, BuildSnapshot>,
        config: &Config,
        reports: &mpsc::UnboundedSender<JobRecord>,
    ) -> Result<(), SyncError> {
        let prev_state = record.status.state;

        match builds.get(&record.name) {
            None => {
                // The backend lost the build.
                record.status.completion_ms = Some(self.clock.epoch_ms());
                record.status.state = JobState::Error;
                record.status.url = config.support_url.clone();
                record.status.description = DESC_MISSING_BUILD.to_string();
            }
            Some(build) => {
                if build.is_enqueued() {
                    // Still in queue.
                    self.increment_pending(&record.spec.job);
                    return Ok(());
                } else if build.is_running() {
                    self.increment_pending(&record.spec.job);
                    if record.status.description == DESC_RUNNING {
                        return Ok(());
                    }
                    record.status.description = DESC_RUNNING.to_string();
                } else if build.is_success() {
                    record.status.completion_ms = Some(self.clock.epoch_ms());
                    record.status.state = JobState::Success;
                    record.status.description = DESC_SUCCEEDED.to_string();
                    self.start_followups(&record, config).await?;
                } else if build.is_failure() {
                    record.status.completion_ms = Some(self.clock.epoch_ms());
                    record.status.state = JobState::Failure;
                    record.status.description = DESC_FAILED.to_string();
                } else if build.is_aborted() {
                    record.status.completion_ms = Some(self.clock.epoch_ms());
                    record.status.state = JobState::Aborted;
                    record.status.description = DESC_ABORTED.to_string();
                }

                // Identify the build and resolve the report URL.
                record.status.pod_name = format!("{}-{}", record.spec.job, build.number);
                record.status.build_id = build.number.to_string();
                record.status.url = render_record(&config.job_url_template, &record);
            }
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
#[path = "pending_tests.rs"]
mod tests;
