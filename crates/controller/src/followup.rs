// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Follow-up jobs chained on parent success.

use crate::controller::Controller;
use crate::error::SyncError;
use gaffer_adapters::{BuildEngine, RecordStore, Reviewer};
use gaffer_config::{Config, ConfigProvider};
use gaffer_core::{Clock, JobRecord, JobType};
use tracing::warn;

impl<S, B, R, P, C> Controller<S, B, R, P, C>
where
    S: RecordStore,
    B: BuildEngine,
    R: Reviewer,
    P: ConfigProvider,
    C: Clock,
{
    /// Create the parent's `run_after_success` children.
    ///
    /// A failed create propagates immediately, which leaves the parent
    /// unpersisted this tick; the next tick reprocesses the parent and will
    /// attempt the remaining children again.
    pub(crate) async fn start_followups(
        &self,
        parent: &JobRecord,
        config: &Config,
    ) -> Result<(), SyncError> {
        for child_spec in &parent.spec.run_after_success {
            if !self.run_after_success_can_run(parent, &child_spec.job, config).await {
                continue;
            }
            let child = JobRecord::from_spec(
                child_spec.clone(),
                parent.spec.labels.clone(),
                self.id_gen.next(),
                self.clock.epoch_ms(),
            );
            self.store
                .create(child)
                .await
                .map_err(|source| SyncError::CreateFollowUp {
                    record: parent.name.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Whether a follow-up child should run once its parent succeeded.
    ///
    /// Only presubmit parents filter children, and only when the child's
    /// presubmit definition carries `run_if_changed`. Every ambiguous case
    /// fails open: a missing definition (the config changed since the parent
    /// started) and a failed changed-files fetch both run the child.
    pub(crate) async fn run_after_success_can_run(
        &self,
        parent: &JobRecord,
        child_job: &str,
        config: &Config,
    ) -> bool {
        if parent.spec.job_type != JobType::Presubmit {
            return true;
        }
        let refs = &parent.spec.refs;
        let Some(pull) = refs.pulls.first() else {
            return true;
        };
        let Some(def) = config.presubmit(&refs.repo_key(), child_job) else {
            return true;
        };
        if def.run_if_changed.is_none() {
            return true;
        }

        match self.reviewer.get_pull_request_changes(&refs.org, &refs.repo, pull.number).await {
            Ok(changes) => {
                let filenames: Vec<String> =
                    changes.into_iter().map(|change| change.filename).collect();
                def.runs_against_changes(&filenames)
            }
            Err(err) => {
                warn!(
                    record = %parent.name,
                    pull = pull.number,
                    error = %err,
                    "cannot fetch changed files, running follow-up"
                );
                true
            }
        }
    }
}

#[cfg(test)]
#[path = "followup_tests.rs"]
mod tests;
