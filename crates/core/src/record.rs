// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job record and its state machine.
//!
//! A [`JobRecord`] is the declarative unit the controller reconciles: an
//! immutable [`JobSpec`] describing what to run, plus a mutable [`JobStatus`]
//! tracking where the build currently stands. Records live in an external
//! store; the controller re-fetches them every tick and is their only writer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Agent value for records this controller handles. Records carrying any
/// other agent belong to a different controller and are filtered out.
pub const JENKINS_AGENT: &str = "jenkins";

/// Lifecycle state of a job record.
///
/// Terminal states are sticky: once `completion_ms` is stamped the record is
/// complete and must never be mutated again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Created, build not yet submitted
    #[default]
    Triggered,
    /// Build submitted, awaiting a terminal result
    Pending,
    Success,
    Failure,
    Aborted,
    /// Controller-side failure (build lost, submit refused)
    Error,
}

impl JobState {
    /// Whether this state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Success | JobState::Failure | JobState::Aborted | JobState::Error
        )
    }
}

crate::simple_display! {
    JobState {
        Triggered => "triggered",
        Pending => "pending",
        Success => "success",
        Failure => "failure",
        Aborted => "aborted",
        Error => "error",
    }
}

/// What triggered the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    /// Runs against a pull request; deduped per (job, org, repo, PR)
    Presubmit,
    /// Runs after a merge
    Postsubmit,
    /// Runs on a timer
    Periodic,
    /// Runs against a batch of pull requests
    Batch,
}

crate::simple_display! {
    JobType {
        Presubmit => "presubmit",
        Postsubmit => "postsubmit",
        Periodic => "periodic",
        Batch => "batch",
    }
}

/// A pull request head the job runs against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pull {
    pub number: u64,
    #[serde(default)]
    pub author: String,
    pub sha: String,
}

/// Repository coordinates and pulls for presubmit/batch jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refs {
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub base_ref: String,
    #[serde(default)]
    pub base_sha: String,
    #[serde(default)]
    pub pulls: Vec<Pull>,
}

impl Refs {
    /// `org/repo` key used for presubmit-definition lookups.
    pub fn repo_key(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }
}

/// Immutable declaration of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Logical job name on the build server
    pub job: String,
    /// Which controller handles this record (see [`JENKINS_AGENT`])
    pub agent: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    /// Commit-status context; empty means "use the job name"
    #[serde(default)]
    pub context: String,
    /// Comment command that re-triggers this job
    #[serde(default)]
    pub rerun_command: String,
    /// Per-job concurrency cap; 0 = unbounded
    #[serde(default)]
    pub max_concurrency: u32,
    #[serde(default)]
    pub refs: Refs,
    /// Follow-up jobs started when this one succeeds
    #[serde(default)]
    pub run_after_success: Vec<JobSpec>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl JobSpec {
    /// Status context to report under, falling back to the job name.
    pub fn report_context(&self) -> &str {
        if self.context.is_empty() {
            &self.job
        } else {
            &self.context
        }
    }
}

/// Mutable controller-owned status of a job record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub state: JobState,
    #[serde(default)]
    pub start_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_ms: Option<u64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    /// Backend identifier, `{job}-{build number}`
    #[serde(default)]
    pub pod_name: String,
    /// Decimal build number on the backend
    #[serde(default)]
    pub build_id: String,
}

/// The unit reconciled each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Stable unique identifier across the record's lifetime
    pub name: String,
    pub spec: JobSpec,
    #[serde(default)]
    pub status: JobStatus,
}

impl JobRecord {
    /// Build a fresh record from a spec, merging in inherited labels.
    ///
    /// Used for controller-created follow-up children: state starts at
    /// `triggered` with the start time stamped, and the parent's labels are
    /// layered over the spec's own.
    pub fn from_spec(
        mut spec: JobSpec,
        labels: HashMap<String, String>,
        name: String,
        epoch_ms: u64,
    ) -> Self {
        for (key, value) in labels {
            spec.labels.insert(key, value);
        }
        Self {
            name,
            spec,
            status: JobStatus {
                state: JobState::Triggered,
                start_ms: epoch_ms,
                ..JobStatus::default()
            },
        }
    }

    /// Whether the record is frozen. Completion time is the source of truth.
    pub fn complete(&self) -> bool {
        self.status.completion_ms.is_some()
    }
}

crate::builder! {
    pub struct JobSpecBuilder => JobSpec {
        into {
            job: String = "unit",
            agent: String = JENKINS_AGENT,
            context: String = "",
            rerun_command: String = "",
        }
        set {
            job_type: JobType = JobType::Periodic,
            max_concurrency: u32 = 0,
            refs: Refs = Refs::default(),
            run_after_success: Vec<JobSpec> = Vec::new(),
            labels: HashMap<String, String> = HashMap::new(),
        }
    }
}

crate::builder! {
    pub struct JobRecordBuilder => JobRecord {
        into {
            name: String = "rec-test-1",
        }
        set {
            spec: JobSpec = JobSpec::builder().build(),
            status: JobStatus = JobStatus::default(),
        }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
