// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const FULL_CONFIG: &str = r#"
max_concurrency = 10
max_workers = 5
allow_cancellations = true
job_url_template = "https://ci.example.org/job/${job}/${build_id}/"
report_template = "${context} ${state}: ${url}"
support_url = "https://ci.example.org/support"

[[presubmit."acme/widget"]]
name = "unit"
run_if_changed = "^src/"
context = "ci/unit"
rerun_command = "/test unit"

[[presubmit."acme/widget"]]
name = "e2e"
"#;

#[test]
fn parses_full_config() {
    let config = parse_config(FULL_CONFIG).unwrap();
    assert_eq!(config.max_concurrency, 10);
    assert_eq!(config.max_workers, 5);
    assert!(config.allow_cancellations);
    assert_eq!(config.job_url_template, "https://ci.example.org/job/${job}/${build_id}/");
    assert_eq!(config.support_url, "https://ci.example.org/support");

    let unit = config.presubmit("acme/widget", "unit").unwrap();
    assert_eq!(unit.context, "ci/unit");
    assert_eq!(unit.rerun_command, "/test unit");
    assert!(config.presubmit("acme/widget", "e2e").is_some());
    assert!(config.presubmit("acme/widget", "missing").is_none());
    assert!(config.presubmit("other/repo", "unit").is_none());
}

#[test]
fn empty_config_gets_defaults() {
    let config = parse_config("").unwrap();
    assert_eq!(config.max_concurrency, 0);
    assert_eq!(config.max_workers, 20);
    assert!(!config.allow_cancellations);
    assert!(config.job_url_template.is_empty());
    assert!(!config.report_template.is_empty());
    assert!(!config.support_url.is_empty());
}

#[test]
fn bad_run_if_changed_is_rejected() {
    let text = r#"
[[presubmit."acme/widget"]]
name = "unit"
run_if_changed = "["
"#;
    let err = parse_config(text).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidRunIfChanged { .. }), "got {err}");
}

#[test]
fn duplicate_presubmit_is_rejected() {
    let text = r#"
[[presubmit."acme/widget"]]
name = "unit"

[[presubmit."acme/widget"]]
name = "unit"
"#;
    let err = parse_config(text).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicatePresubmit { .. }), "got {err}");
}

#[test]
fn load_config_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gaffer.toml");
    std::fs::write(&path, "max_concurrency = 3").unwrap();
    let config = load_config(&path).unwrap();
    assert_eq!(config.max_concurrency, 3);
}

#[test]
fn fixed_provider_hands_out_same_snapshot() {
    let provider = FixedConfig::new(parse_config("max_concurrency = 7").unwrap());
    let a = provider.snapshot();
    let b = provider.snapshot();
    assert_eq!(a.max_concurrency, 7);
    assert!(Arc::ptr_eq(&a, &b));
}
