// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the controller crate.

use crate::Controller;
use gaffer_adapters::{FakeBuildEngine, FakeRecordStore, FakeReviewer};
use gaffer_config::{Config, FixedConfig};
use gaffer_core::{
    FakeClock, JobRecord, JobSpec, JobState, JobStatus, JobType, Pull, Refs, SeqIdGen,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Convenience alias for the fully-faked controller.
pub(crate) type TestController =
    Controller<FakeRecordStore, FakeBuildEngine, FakeReviewer, FixedConfig, FakeClock>;

/// Test context holding the controller and its fake collaborators.
pub(crate) struct TestContext {
    pub controller: TestController,
    pub store: FakeRecordStore,
    pub engine: FakeBuildEngine,
    pub reviewer: FakeReviewer,
    pub clock: FakeClock,
}

/// Configuration with a URL template so driver tests see resolved URLs.
pub(crate) fn test_config() -> Config {
    Config {
        job_url_template: "https://ci.example.org/job/${job}/${build_id}/".to_string(),
        ..Config::default()
    }
}

/// Build a controller wired to fresh fakes and deterministic IDs.
pub(crate) fn setup(config: Config) -> TestContext {
    let store = FakeRecordStore::new();
    let engine = FakeBuildEngine::new();
    let reviewer = FakeReviewer::new();
    let clock = FakeClock::new();
    let controller = Controller::new(
        store.clone(),
        engine.clone(),
        reviewer.clone(),
        FixedConfig::new(config),
        clock.clone(),
        "",
    )
    .with_id_gen(Arc::new(SeqIdGen::new()));
    TestContext { controller, store, engine, reviewer, clock }
}

/// A periodic record in the given state.
pub(crate) fn record_in_state(name: &str, job: &str, state: JobState) -> JobRecord {
    JobRecord::builder()
        .name(name)
        .spec(JobSpec::builder().job(job).build())
        .status(JobStatus { state, ..JobStatus::default() })
        .build()
}

/// Refs for a pull of acme/widget.
pub(crate) fn pull_refs(number: u64, sha: &str) -> Refs {
    Refs {
        org: "acme".into(),
        repo: "widget".into(),
        base_ref: "main".into(),
        base_sha: "base0000".into(),
        pulls: vec![Pull { number, author: "dev".into(), sha: sha.into() }],
    }
}

/// A non-complete presubmit record for dedupe and report tests.
pub(crate) fn presubmit_record(name: &str, job: &str, pull: u64, start_ms: u64) -> JobRecord {
    JobRecord::builder()
        .name(name)
        .spec(
            JobSpec::builder()
                .job(job)
                .job_type(JobType::Presubmit)
                .refs(pull_refs(pull, "abc123"))
                .build(),
        )
        .status(JobStatus { state: JobState::Triggered, start_ms, ..JobStatus::default() })
        .build()
}

/// Report channel for direct driver calls.
pub(crate) fn report_channel(
) -> (mpsc::UnboundedSender<JobRecord>, mpsc::UnboundedReceiver<JobRecord>) {
    mpsc::unbounded_channel()
}

/// Drain every buffered report.
pub(crate) fn drain_reports(rx: &mut mpsc::UnboundedReceiver<JobRecord>) -> Vec<JobRecord> {
    let mut reports = Vec::new();
    while let Ok(record) = rx.try_recv() {
        reports.push(record);
    }
    reports
}
