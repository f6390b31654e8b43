// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unit tests for reporting.

use super::*;
use crate::test_helpers::{presubmit_record, pull_refs, record_in_state, setup, test_config};
use gaffer_adapters::FAKE_BOT_NAME;
use gaffer_config::ConfigProvider;
use gaffer_core::{JobState, JobType};

fn complete_presubmit(state: JobState) -> gaffer_core::JobRecord {
    let mut record = presubmit_record("rec-a", "unit", 42, 1_000);
    record.status.state = state;
    record.status.completion_ms = Some(2_000);
    record.status.description = "done".into();
    record.status.url = "https://ci/unit/3".into();
    record
}

#[tokio::test]
async fn postsubmit_record_gets_status_against_the_base_sha() {
    let ctx = setup(test_config());
    let mut record = record_in_state("rec-a", "unit", JobState::Failure);
    record.spec.job_type = JobType::Postsubmit;
    record.spec.refs = pull_refs(0, "");
    record.spec.refs.pulls.clear();
    record.status.completion_ms = Some(2_000);
    let config = ctx.controller.config.snapshot();

    report(&ctx.reviewer, &config, &record).await.unwrap();

    // One status on the base SHA; comment upkeep needs a pull, so nothing
    // else is touched even though the record is complete and failed.
    let statuses = ctx.reviewer.statuses();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].sha, "base0000");
    assert_eq!(statuses[0].status.state, StatusState::Failure);
    assert!(ctx.reviewer.comments("acme", "widget", 42).is_empty());
}

#[tokio::test]
async fn batch_record_gets_status_on_the_pull_head() {
    let ctx = setup(test_config());
    let mut record = record_in_state("rec-a", "unit", JobState::Pending);
    record.spec.job_type = JobType::Batch;
    record.spec.refs = pull_refs(42, "abc123");
    let config = ctx.controller.config.snapshot();

    report(&ctx.reviewer, &config, &record).await.unwrap();

    let statuses = ctx.reviewer.statuses();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].sha, "abc123");
    assert_eq!(statuses[0].status.state, StatusState::Pending);
}

#[tokio::test]
async fn periodic_record_is_still_reported_once() {
    let ctx = setup(test_config());
    let record = record_in_state("rec-a", "unit", JobState::Pending);
    let config = ctx.controller.config.snapshot();

    report(&ctx.reviewer, &config, &record).await.unwrap();
    assert_eq!(ctx.reviewer.statuses().len(), 1);
}

#[tokio::test]
async fn pending_record_gets_status_only() {
    let ctx = setup(test_config());
    let mut record = presubmit_record("rec-a", "unit", 42, 1_000);
    record.status.state = JobState::Pending;
    record.status.description = "Build enqueued.".into();
    record.status.url = "https://ci/unit/3".into();
    let config = ctx.controller.config.snapshot();

    report(&ctx.reviewer, &config, &record).await.unwrap();

    let statuses = ctx.reviewer.statuses();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].sha, "abc123");
    assert_eq!(statuses[0].status.state, StatusState::Pending);
    assert_eq!(statuses[0].status.context, "unit");
    assert_eq!(statuses[0].status.target_url, "https://ci/unit/3");
    assert!(ctx.reviewer.comments("acme", "widget", 42).is_empty());
}

#[tokio::test]
async fn state_mapping_covers_all_terminals() {
    let ctx = setup(test_config());
    let config = ctx.controller.config.snapshot();
    for (state, expected) in [
        (JobState::Success, StatusState::Success),
        (JobState::Failure, StatusState::Failure),
        (JobState::Aborted, StatusState::Failure),
        (JobState::Error, StatusState::Error),
    ] {
        report(&ctx.reviewer, &config, &complete_presubmit(state)).await.unwrap();
        let statuses = ctx.reviewer.statuses();
        assert_eq!(statuses.last().unwrap().status.state, expected, "for {state}");
    }
}

#[tokio::test]
async fn failure_leaves_a_marked_comment_with_rerun_command() {
    let ctx = setup(test_config());
    let mut record = complete_presubmit(JobState::Failure);
    record.spec.rerun_command = "/test unit".into();
    let config = ctx.controller.config.snapshot();

    report(&ctx.reviewer, &config, &record).await.unwrap();

    let comments = ctx.reviewer.comments("acme", "widget", 42);
    assert_eq!(comments.len(), 1);
    assert!(comments[0].body.contains("<!-- gaffer: unit -->"));
    assert!(comments[0].body.contains("/test unit"));
    assert!(comments[0].body.contains("https://ci/unit/3"));
}

#[tokio::test]
async fn repeated_failure_edits_the_existing_comment() {
    let ctx = setup(test_config());
    let record = complete_presubmit(JobState::Failure);
    let config = ctx.controller.config.snapshot();

    report(&ctx.reviewer, &config, &record).await.unwrap();
    report(&ctx.reviewer, &config, &record).await.unwrap();

    assert_eq!(ctx.reviewer.comments("acme", "widget", 42).len(), 1);
    assert_eq!(ctx.reviewer.edited().len(), 1);
}

#[tokio::test]
async fn success_clears_previous_bot_comments() {
    let ctx = setup(test_config());
    let stale = ctx.reviewer.seed_comment(
        "acme",
        "widget",
        42,
        FAKE_BOT_NAME,
        "unit failed <!-- gaffer: unit -->",
    );
    let config = ctx.controller.config.snapshot();

    report(&ctx.reviewer, &config, &complete_presubmit(JobState::Success)).await.unwrap();

    assert!(ctx.reviewer.comments("acme", "widget", 42).is_empty());
    assert_eq!(ctx.reviewer.deleted(), vec![stale]);
}

#[tokio::test]
async fn aborted_record_does_not_leave_a_comment() {
    let ctx = setup(test_config());
    let config = ctx.controller.config.snapshot();

    report(&ctx.reviewer, &config, &complete_presubmit(JobState::Aborted)).await.unwrap();
    assert!(ctx.reviewer.comments("acme", "widget", 42).is_empty());
}

#[tokio::test]
async fn foreign_comments_are_never_touched() {
    let ctx = setup(test_config());
    ctx.reviewer.seed_comment("acme", "widget", 42, "human", "looks flaky <!-- gaffer: unit -->");
    ctx.reviewer.seed_comment("acme", "widget", 42, FAKE_BOT_NAME, "chat about <!-- gaffer: e2e -->");
    let config = ctx.controller.config.snapshot();

    report(&ctx.reviewer, &config, &complete_presubmit(JobState::Success)).await.unwrap();

    // Neither the human comment nor the bot comment for another context
    // matches this record's marker.
    assert_eq!(ctx.reviewer.comments("acme", "widget", 42).len(), 2);
    assert!(ctx.reviewer.deleted().is_empty());
}

#[tokio::test]
async fn custom_context_is_used_for_status_and_marker() {
    let ctx = setup(test_config());
    let mut record = complete_presubmit(JobState::Failure);
    record.spec.context = "ci/unit".into();
    let config = ctx.controller.config.snapshot();

    report(&ctx.reviewer, &config, &record).await.unwrap();

    assert_eq!(ctx.reviewer.statuses()[0].status.context, "ci/unit");
    assert!(ctx.reviewer.comments("acme", "widget", 42)[0]
        .body
        .contains("<!-- gaffer: ci/unit -->"));
}
