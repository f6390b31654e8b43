// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Presubmit definitions and the file-change predicate.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One presubmit job for a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresubmitDef {
    /// Logical job name, matched against `JobSpec.job`
    pub name: String,
    /// Regex over changed filenames; the job only runs when a file matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_if_changed: Option<String>,
    /// Commit-status context (empty = job name)
    #[serde(default)]
    pub context: String,
    /// Comment command that re-triggers the job
    #[serde(default)]
    pub rerun_command: String,
    /// Compiled at config load; never serialized
    #[serde(skip)]
    changes_regex: Option<Regex>,
}

impl PresubmitDef {
    /// Compile `run_if_changed`. Called once during config validation.
    pub(crate) fn compile(&mut self) -> Result<(), regex::Error> {
        if let Some(pattern) = &self.run_if_changed {
            self.changes_regex = Some(Regex::new(pattern)?);
        }
        Ok(())
    }

    /// Whether the job should run for the given changed filenames.
    ///
    /// True when any filename matches `run_if_changed`, and always true when
    /// no filter is configured.
    pub fn runs_against_changes(&self, changes: &[String]) -> bool {
        match &self.changes_regex {
            Some(re) => changes.iter().any(|filename| re.is_match(filename)),
            None => true,
        }
    }
}

#[cfg(test)]
#[path = "presubmit_tests.rs"]
mod tests;
