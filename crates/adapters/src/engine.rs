// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build engine adapter: submits, lists, and aborts builds on the backend.

use async_trait::async_trait;
use gaffer_core::{BuildSnapshot, JobRecord};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from build engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("submit failed: {0}")]
    Submit(String),
    #[error("list failed: {0}")]
    List(String),
    #[error("abort failed: {0}")]
    Abort(String),
}

/// Adapter for the build backend.
#[async_trait]
pub trait BuildEngine: Clone + Send + Sync + 'static {
    /// Enqueue a build for the record. The build will later appear in
    /// [`list`](Self::list) keyed by the record's name.
    async fn submit(&self, record: &JobRecord) -> Result<(), EngineError>;

    /// Snapshot the builds of the given logical jobs, keyed by record name.
    async fn list(&self, jobs: &[String]) -> Result<HashMap<String, BuildSnapshot>, EngineError>;

    /// Abort a build of the given logical job.
    async fn abort(&self, job: &str, build: &BuildSnapshot) -> Result<(), EngineError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{BuildEngine, EngineError};
    use async_trait::async_trait;
    use gaffer_core::{BuildSnapshot, JobRecord};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct ScriptedBuild {
        job: String,
        snapshot: BuildSnapshot,
    }

    #[derive(Default)]
    struct FakeEngineState {
        builds: HashMap<String, ScriptedBuild>,
        submits: Vec<String>,
        aborts: Vec<(String, u64)>,
        list_calls: Vec<Vec<String>>,
        fail_submit: Option<String>,
        fail_list: Option<String>,
        fail_abort: Option<String>,
    }

    /// Scripted build backend for testing.
    #[derive(Clone, Default)]
    pub struct FakeBuildEngine {
        inner: Arc<Mutex<FakeEngineState>>,
    }

    impl FakeBuildEngine {
        pub fn new() -> Self {
            Self::default()
        }

        /// Script a build snapshot for a record of the given logical job.
        pub fn add_build(&self, record_name: &str, job: &str, snapshot: BuildSnapshot) {
            self.inner.lock().builds.insert(
                record_name.to_string(),
                ScriptedBuild { job: job.to_string(), snapshot },
            );
        }

        /// Record names submitted, in call order.
        pub fn submits(&self) -> Vec<String> {
            self.inner.lock().submits.clone()
        }

        /// (job, build number) pairs aborted, in call order.
        pub fn aborts(&self) -> Vec<(String, u64)> {
            self.inner.lock().aborts.clone()
        }

        /// Job-name sets requested from `list`, in call order.
        pub fn list_calls(&self) -> Vec<Vec<String>> {
            self.inner.lock().list_calls.clone()
        }

        pub fn fail_submit(&self, message: &str) {
            self.inner.lock().fail_submit = Some(message.to_string());
        }

        pub fn fail_list(&self, message: &str) {
            self.inner.lock().fail_list = Some(message.to_string());
        }

        pub fn fail_abort(&self, message: &str) {
            self.inner.lock().fail_abort = Some(message.to_string());
        }
    }

    #[async_trait]
    impl BuildEngine for FakeBuildEngine {
        async fn submit(&self, record: &JobRecord) -> Result<(), EngineError> {
            let mut state = self.inner.lock();
            if let Some(message) = &state.fail_submit {
                return Err(EngineError::Submit(message.clone()));
            }
            state.submits.push(record.name.clone());
            Ok(())
        }

        async fn list(
            &self,
            jobs: &[String],
        ) -> Result<HashMap<String, BuildSnapshot>, EngineError> {
            let mut state = self.inner.lock();
            if let Some(message) = &state.fail_list {
                return Err(EngineError::List(message.clone()));
            }
            state.list_calls.push(jobs.to_vec());
            Ok(state
                .builds
                .iter()
                .filter(|(_, build)| jobs.contains(&build.job))
                .map(|(name, build)| (name.clone(), build.snapshot.clone()))
                .collect())
        }

        async fn abort(&self, job: &str, build: &BuildSnapshot) -> Result<(), EngineError> {
            let mut state = self.inner.lock();
            if let Some(message) = &state.fail_abort {
                return Err(EngineError::Abort(message.clone()));
            }
            state.aborts.push((job.to_string(), build.number));
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeBuildEngine;

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
