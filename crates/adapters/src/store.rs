// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record store adapter: the external system of record for job records.

use async_trait::async_trait;
use gaffer_core::JobRecord;
use thiserror::Error;

/// Errors from record store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("record already exists: {0}")]
    AlreadyExists(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Adapter for the job-record store.
///
/// The controller never deletes records; it lists, creates follow-up
/// children, and replaces whole records by name.
#[async_trait]
pub trait RecordStore: Clone + Send + Sync + 'static {
    /// List records matching a label selector (`key=value`, comma-separated;
    /// empty selects everything).
    async fn list(&self, selector: &str) -> Result<Vec<JobRecord>, StoreError>;

    /// Persist a new record. The record's name must be unused.
    async fn create(&self, record: JobRecord) -> Result<JobRecord, StoreError>;

    /// Replace the record stored under `name` wholesale.
    async fn replace(&self, name: &str, record: JobRecord) -> Result<JobRecord, StoreError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{RecordStore, StoreError};
    use async_trait::async_trait;
    use gaffer_core::JobRecord;
    use parking_lot::Mutex;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeStoreState {
        records: BTreeMap<String, JobRecord>,
        creates: Vec<JobRecord>,
        replaces: Vec<JobRecord>,
        fail_list: Option<String>,
        fail_replace: Option<String>,
        fail_create: Option<String>,
    }

    /// In-memory record store for testing.
    ///
    /// Listing returns records in name order so tests are deterministic.
    #[derive(Clone, Default)]
    pub struct FakeRecordStore {
        inner: Arc<Mutex<FakeStoreState>>,
    }

    impl FakeRecordStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a record without recording a create call.
        pub fn seed(&self, record: JobRecord) {
            self.inner.lock().records.insert(record.name.clone(), record);
        }

        /// Current stored record by name.
        pub fn get(&self, name: &str) -> Option<JobRecord> {
            self.inner.lock().records.get(name).cloned()
        }

        /// All stored records in name order.
        pub fn records(&self) -> Vec<JobRecord> {
            self.inner.lock().records.values().cloned().collect()
        }

        /// Records passed to `create`, in call order.
        pub fn creates(&self) -> Vec<JobRecord> {
            self.inner.lock().creates.clone()
        }

        /// Records passed to `replace`, in call order.
        pub fn replaces(&self) -> Vec<JobRecord> {
            self.inner.lock().replaces.clone()
        }

        pub fn fail_list(&self, message: &str) {
            self.inner.lock().fail_list = Some(message.to_string());
        }

        pub fn fail_replace(&self, message: &str) {
            self.inner.lock().fail_replace = Some(message.to_string());
        }

        pub fn fail_create(&self, message: &str) {
            self.inner.lock().fail_create = Some(message.to_string());
        }
    }

    fn selector_matches(selector: &str, record: &JobRecord) -> bool {
        selector.split(',').filter(|pair| !pair.is_empty()).all(|pair| {
            match pair.split_once('=') {
                Some((key, value)) => {
                    record.spec.labels.get(key.trim()).is_some_and(|v| v == value.trim())
                }
                None => false,
            }
        })
    }

    #[async_trait]
    impl RecordStore for FakeRecordStore {
        async fn list(&self, selector: &str) -> Result<Vec<JobRecord>, StoreError> {
            let state = self.inner.lock();
            if let Some(message) = &state.fail_list {
                return Err(StoreError::Unavailable(message.clone()));
            }
            Ok(state
                .records
                .values()
                .filter(|record| selector_matches(selector, record))
                .cloned()
                .collect())
        }

        async fn create(&self, record: JobRecord) -> Result<JobRecord, StoreError> {
            let mut state = self.inner.lock();
            if let Some(message) = &state.fail_create {
                return Err(StoreError::Unavailable(message.clone()));
            }
            if state.records.contains_key(&record.name) {
                return Err(StoreError::AlreadyExists(record.name.clone()));
            }
            state.records.insert(record.name.clone(), record.clone());
            state.creates.push(record.clone());
            Ok(record)
        }

        async fn replace(&self, name: &str, record: JobRecord) -> Result<JobRecord, StoreError> {
            let mut state = self.inner.lock();
            if let Some(message) = &state.fail_replace {
                return Err(StoreError::Unavailable(message.clone()));
            }
            if !state.records.contains_key(name) {
                return Err(StoreError::NotFound(name.to_string()));
            }
            state.records.insert(name.to_string(), record.clone());
            state.replaces.push(record.clone());
            Ok(record)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeRecordStore;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
