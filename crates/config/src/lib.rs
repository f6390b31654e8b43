// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gaffer-config: controller tunables and presubmit definitions.
//!
//! Configuration is TOML. [`parse_config`] validates eagerly — regexes are
//! compiled and duplicate presubmits rejected at load time — so the
//! controller never discovers a bad config mid-tick.

pub mod presubmit;
pub mod template;

pub use presubmit::PresubmitDef;
pub use template::{interpolate, record_vars, render_record};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid run_if_changed for {job} in {repo}: {source}")]
    InvalidRunIfChanged {
        repo: String,
        job: String,
        #[source]
        source: regex::Error,
    },
    #[error("duplicate presubmit {job} for {repo}")]
    DuplicatePresubmit { repo: String, job: String },
}

fn default_max_workers() -> usize {
    20
}

fn default_report_template() -> String {
    "${context} ${state} for ${org}/${repo}#${pull}. Details: ${url}".to_string()
}

fn default_support_url() -> String {
    "https://github.com/alfredjeanlab/gaffer/issues".to_string()
}

/// Controller configuration, immutable once parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Global cap on concurrently pending records; 0 = unbounded
    #[serde(default)]
    pub max_concurrency: u32,
    /// Worker-pool size per reconciliation phase
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Whether superseded presubmit builds may be aborted on the backend
    #[serde(default)]
    pub allow_cancellations: bool,
    /// `${var}` template producing a record's report URL
    #[serde(default)]
    pub job_url_template: String,
    /// `${var}` template for report comment bodies
    #[serde(default = "default_report_template")]
    pub report_template: String,
    /// Fallback URL attached to records that error inside the controller
    #[serde(default = "default_support_url")]
    pub support_url: String,
    /// Presubmit definitions keyed by `org/repo`
    #[serde(default, rename = "presubmit")]
    pub presubmits: HashMap<String, Vec<PresubmitDef>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrency: 0,
            max_workers: default_max_workers(),
            allow_cancellations: false,
            job_url_template: String::new(),
            report_template: default_report_template(),
            support_url: default_support_url(),
            presubmits: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a presubmit definition by `org/repo` key and job name.
    pub fn presubmit(&self, repo_key: &str, job: &str) -> Option<&PresubmitDef> {
        self.presubmits.get(repo_key)?.iter().find(|def| def.name == job)
    }
}

/// Parse and validate a TOML configuration string.
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(text)?;
    for (repo, defs) in &mut config.presubmits {
        let mut seen = std::collections::HashSet::new();
        for def in defs.iter_mut() {
            if !seen.insert(def.name.clone()) {
                return Err(ConfigError::DuplicatePresubmit {
                    repo: repo.clone(),
                    job: def.name.clone(),
                });
            }
            def.compile().map_err(|source| ConfigError::InvalidRunIfChanged {
                repo: repo.clone(),
                job: def.name.clone(),
                source,
            })?;
        }
    }
    Ok(config)
}

/// Load configuration from a TOML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Supplies the configuration snapshot the controller uses for one tick.
pub trait ConfigProvider: Clone + Send + Sync + 'static {
    fn snapshot(&self) -> Arc<Config>;
}

/// A provider that always hands out the same parsed configuration.
#[derive(Clone)]
pub struct FixedConfig(Arc<Config>);

impl FixedConfig {
    pub fn new(config: Config) -> Self {
        Self(Arc::new(config))
    }
}

impl ConfigProvider for FixedConfig {
    fn snapshot(&self) -> Arc<Config> {
        self.0.clone()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
