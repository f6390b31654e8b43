// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Presubmit deduplication: newer commits supersede older runs.

use crate::controller::{log_transition, Controller};
use crate::error::SyncError;
use gaffer_adapters::{BuildEngine, RecordStore, Reviewer};
use gaffer_config::{Config, ConfigProvider};
use gaffer_core::{BuildSnapshot, Clock, JobRecord, JobState, JobType};
use std::collections::HashMap;
use tracing::warn;

impl<S, B, R, P, C> Controller<S, B, R, P, C>
where
    S: RecordStore,
    B: BuildEngine,
    R: Reviewer,
    P: ConfigProvider,
    C: Clock,
{
    /// Abort presubmit records superseded by a newer run of the same
    /// (job, org, repo, pull). The greatest start time survives; on equal
    /// start times the later list entry wins. Aborted entries are replaced
    /// in `records` in place.
    pub(crate) async fn terminate_dupes(
        &self,
        records: &mut [JobRecord],
        builds: &HashMap<String, BuildSnapshot>,
        config: &Config,
    ) -> Result<(), SyncError> {
        // "job org/repo#number" -> index of the newest record seen so far
        let mut newest: HashMap<String, usize> = HashMap::new();
        for index in 0..records.len() {
            if records[index].complete() || records[index].spec.job_type != JobType::Presubmit {
                continue;
            }
            let refs = &records[index].spec.refs;
            let Some(pull_number) = refs.pulls.first().map(|p| p.number) else {
                continue;
            };
            let key = format!(
                "{} {}/{}#{}",
                records[index].spec.job, refs.org, refs.repo, pull_number
            );

            let cancel_index = match newest.get(&key).copied() {
                None => {
                    newest.insert(key, index);
                    continue;
                }
                Some(prev) => {
                    if records[prev].status.start_ms <= records[index].status.start_ms {
                        newest.insert(key, index);
                        prev
                    } else {
                        index
                    }
                }
            };

            let loser = &records[cancel_index];
            if config.allow_cancellations {
                match builds.get(&loser.name) {
                    // Avoid cancelling enqueued builds: dequeueing is racy
                    // and a no-op on most backends.
                    Some(build) if build.is_enqueued() => continue,
                    Some(build) => {
                        if let Err(err) = self.engine.abort(&loser.spec.job, build).await {
                            warn!(
                                record = %loser.name,
                                job = %loser.spec.job,
                                error = %err,
                                "cannot cancel superseded build"
                            );
                        }
                    }
                    None => {}
                }
            }

            let mut cancelled = records[cancel_index].clone();
            let prev_state = cancelled.status.state;
            cancelled.status.completion_ms = Some(self.clock.epoch_ms());
            cancelled.status.state = JobState::Aborted;
            log_transition(&cancelled, prev_state);

            let name = cancelled.name.clone();
            let replaced = self
                .store
                .replace(&name, cancelled)
                .await
                .map_err(|source| SyncError::Replace { record: name, source })?;
            records[cancel_index] = replaced;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "dedupe_tests.rs"]
mod tests;
