// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unit tests for follow-up admission.

use super::*;
use crate::test_helpers::{presubmit_record, record_in_state, setup, test_config};
use gaffer_config::parse_config;
use gaffer_core::{JobSpec, JobState};

fn config_with_presubmit(body: &str) -> gaffer_config::Config {
    let mut config = parse_config(body).unwrap();
    config.job_url_template = test_config().job_url_template;
    config
}

#[tokio::test]
async fn non_presubmit_parent_always_runs_children() {
    let ctx = setup(test_config());
    let parent = record_in_state("rec-a", "unit", JobState::Pending);
    let config = ctx.controller.config.snapshot();
    assert!(ctx.controller.run_after_success_can_run(&parent, "deploy", &config).await);
}

#[tokio::test]
async fn missing_definition_fails_open() {
    let ctx = setup(test_config());
    let parent = presubmit_record("rec-a", "unit", 42, 1_000);
    let config = ctx.controller.config.snapshot();
    assert!(ctx.controller.run_after_success_can_run(&parent, "deploy", &config).await);
}

#[tokio::test]
async fn definition_without_filter_fails_open() {
    let config = config_with_presubmit(
        r#"
[[presubmit."acme/widget"]]
name = "deploy"
"#,
    );
    let ctx = setup(config);
    let parent = presubmit_record("rec-a", "unit", 42, 1_000);
    let config = ctx.controller.config.snapshot();
    assert!(ctx.controller.run_after_success_can_run(&parent, "deploy", &config).await);
}

#[tokio::test]
async fn filter_verdict_follows_changed_files() {
    let config = config_with_presubmit(
        r#"
[[presubmit."acme/widget"]]
name = "deploy"
run_if_changed = "^deploy/"
"#,
    );
    let ctx = setup(config);
    let parent = presubmit_record("rec-a", "unit", 42, 1_000);
    let config = ctx.controller.config.snapshot();

    ctx.reviewer.set_changes(42, &["deploy/chart.yaml", "README.md"]);
    assert!(ctx.controller.run_after_success_can_run(&parent, "deploy", &config).await);

    ctx.reviewer.set_changes(42, &["README.md"]);
    assert!(!ctx.controller.run_after_success_can_run(&parent, "deploy", &config).await);
}

#[tokio::test]
async fn changed_files_fetch_error_fails_open() {
    let config = config_with_presubmit(
        r#"
[[presubmit."acme/widget"]]
name = "deploy"
run_if_changed = "^deploy/"
"#,
    );
    let ctx = setup(config);
    ctx.reviewer.fail_changes("rate limited");
    let parent = presubmit_record("rec-a", "unit", 42, 1_000);
    let config = ctx.controller.config.snapshot();
    assert!(ctx.controller.run_after_success_can_run(&parent, "deploy", &config).await);
}

#[tokio::test]
async fn start_followups_skips_filtered_children() {
    let config = config_with_presubmit(
        r#"
[[presubmit."acme/widget"]]
name = "deploy"
run_if_changed = "^deploy/"
"#,
    );
    let ctx = setup(config);
    ctx.reviewer.set_changes(42, &["src/lib.rs"]);

    let mut parent = presubmit_record("rec-a", "unit", 42, 1_000);
    parent.spec.run_after_success = vec![
        JobSpec::builder().job("deploy").build(),
        JobSpec::builder().job("notify").build(),
    ];
    let config = ctx.controller.config.snapshot();

    ctx.controller.start_followups(&parent, &config).await.unwrap();

    // "deploy" is filtered out by run_if_changed; "notify" has no
    // definition and fails open.
    let creates = ctx.store.creates();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].spec.job, "notify");
    assert_eq!(creates[0].name, "rec-1");
}
