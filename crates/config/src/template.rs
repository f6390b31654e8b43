// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Template variable interpolation for URL and report templates.

use gaffer_core::JobRecord;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex pattern for ${variable_name}
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
pub static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// Interpolate `${name}` placeholders with values from the vars map.
///
/// Unknown template variables are left as-is.
pub fn interpolate(template: &str, vars: &HashMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let name = &caps[1];
            match vars.get(name) {
                Some(val) => val.clone(),
                None => caps[0].to_string(),
            }
        })
        .to_string()
}

/// Template variables derived from a record.
///
/// `pull` and `sha` come from the first pull; `sha` falls back to the base
/// SHA for post-merge jobs.
pub fn record_vars(record: &JobRecord) -> HashMap<String, String> {
    let refs = &record.spec.refs;
    let mut vars = HashMap::new();
    vars.insert("job".to_string(), record.spec.job.clone());
    vars.insert("type".to_string(), record.spec.job_type.to_string());
    vars.insert("context".to_string(), record.spec.report_context().to_string());
    vars.insert("rerun".to_string(), record.spec.rerun_command.clone());
    vars.insert("state".to_string(), record.status.state.to_string());
    vars.insert("description".to_string(), record.status.description.clone());
    vars.insert("url".to_string(), record.status.url.clone());
    vars.insert("pod_name".to_string(), record.status.pod_name.clone());
    vars.insert("build_id".to_string(), record.status.build_id.clone());
    vars.insert("org".to_string(), refs.org.clone());
    vars.insert("repo".to_string(), refs.repo.clone());
    vars.insert(
        "pull".to_string(),
        refs.pulls.first().map(|p| p.number.to_string()).unwrap_or_default(),
    );
    vars.insert(
        "sha".to_string(),
        refs.pulls.first().map(|p| p.sha.clone()).unwrap_or_else(|| refs.base_sha.clone()),
    );
    vars
}

/// Render a template against a record. Deterministic in the record contents.
pub fn render_record(template: &str, record: &JobRecord) -> String {
    interpolate(template, &record_vars(record))
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
