// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reviewer adapter: commit statuses and comments on the review platform.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from review-platform operations
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("review call failed: {0}")]
    Api(String),
}

/// Commit-status state on the review platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusState {
    Pending,
    Success,
    Failure,
    Error,
}

gaffer_core::simple_display! {
    StatusState {
        Pending => "pending",
        Success => "success",
        Failure => "failure",
        Error => "error",
    }
}

/// A commit status to post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub state: StatusState,
    pub description: String,
    pub context: String,
    pub target_url: String,
}

/// A comment on a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    pub author: String,
    pub body: String,
}

/// One changed file in a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullChange {
    pub filename: String,
}

/// Adapter for the code-review platform.
#[async_trait]
pub trait Reviewer: Clone + Send + Sync + 'static {
    /// Login of the account this controller posts as.
    async fn bot_name(&self) -> Result<String, ReviewError>;

    async fn create_status(
        &self,
        org: &str,
        repo: &str,
        sha: &str,
        status: Status,
    ) -> Result<(), ReviewError>;

    async fn list_issue_comments(
        &self,
        org: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<IssueComment>, ReviewError>;

    async fn create_comment(
        &self,
        org: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), ReviewError>;

    async fn delete_comment(&self, org: &str, repo: &str, id: u64) -> Result<(), ReviewError>;

    async fn edit_comment(
        &self,
        org: &str,
        repo: &str,
        id: u64,
        body: &str,
    ) -> Result<(), ReviewError>;

    /// Changed files for a pull request.
    async fn get_pull_request_changes(
        &self,
        org: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<PullChange>, ReviewError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{IssueComment, PullChange, Reviewer, ReviewError, Status};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Recorded status post
    #[derive(Debug, Clone)]
    pub struct StatusCall {
        pub org: String,
        pub repo: String,
        pub sha: String,
        pub status: Status,
    }

    #[derive(Default)]
    struct FakeReviewerState {
        statuses: Vec<StatusCall>,
        comments: HashMap<(String, String, u64), Vec<IssueComment>>,
        next_comment_id: u64,
        changes: HashMap<u64, Vec<PullChange>>,
        deleted: Vec<u64>,
        edited: Vec<u64>,
        fail_changes: Option<String>,
        fail_status: Option<String>,
    }

    /// Recording reviewer for testing.
    #[derive(Clone, Default)]
    pub struct FakeReviewer {
        inner: Arc<Mutex<FakeReviewerState>>,
    }

    pub const FAKE_BOT_NAME: &str = "gaffer-bot";

    impl FakeReviewer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Script the changed-file list for a pull request.
        pub fn set_changes(&self, number: u64, filenames: &[&str]) {
            self.inner.lock().changes.insert(
                number,
                filenames.iter().map(|f| PullChange { filename: f.to_string() }).collect(),
            );
        }

        /// Seed an existing comment; returns its id.
        pub fn seed_comment(&self, org: &str, repo: &str, number: u64, author: &str, body: &str) -> u64 {
            let mut state = self.inner.lock();
            state.next_comment_id += 1;
            let id = state.next_comment_id;
            state
                .comments
                .entry((org.to_string(), repo.to_string(), number))
                .or_default()
                .push(IssueComment { id, author: author.to_string(), body: body.to_string() });
            id
        }

        pub fn fail_changes(&self, message: &str) {
            self.inner.lock().fail_changes = Some(message.to_string());
        }

        pub fn fail_status(&self, message: &str) {
            self.inner.lock().fail_status = Some(message.to_string());
        }

        /// All posted statuses, in call order.
        pub fn statuses(&self) -> Vec<StatusCall> {
            self.inner.lock().statuses.clone()
        }

        /// Current comments on a pull request.
        pub fn comments(&self, org: &str, repo: &str, number: u64) -> Vec<IssueComment> {
            self.inner
                .lock()
                .comments
                .get(&(org.to_string(), repo.to_string(), number))
                .cloned()
                .unwrap_or_default()
        }

        /// IDs of deleted comments, in call order.
        pub fn deleted(&self) -> Vec<u64> {
            self.inner.lock().deleted.clone()
        }

        /// IDs of edited comments, in call order.
        pub fn edited(&self) -> Vec<u64> {
            self.inner.lock().edited.clone()
        }
    }

    #[async_trait]
    impl Reviewer for FakeReviewer {
        async fn bot_name(&self) -> Result<String, ReviewError> {
            Ok(FAKE_BOT_NAME.to_string())
        }

        async fn create_status(
            &self,
            org: &str,
            repo: &str,
            sha: &str,
            status: Status,
        ) -> Result<(), ReviewError> {
            let mut state = self.inner.lock();
            if let Some(message) = &state.fail_status {
                return Err(ReviewError::Api(message.clone()));
            }
            state.statuses.push(StatusCall {
                org: org.to_string(),
                repo: repo.to_string(),
                sha: sha.to_string(),
                status,
            });
            Ok(())
        }

        async fn list_issue_comments(
            &self,
            org: &str,
            repo: &str,
            number: u64,
        ) -> Result<Vec<IssueComment>, ReviewError> {
            Ok(self
                .inner
                .lock()
                .comments
                .get(&(org.to_string(), repo.to_string(), number))
                .cloned()
                .unwrap_or_default())
        }

        async fn create_comment(
            &self,
            org: &str,
            repo: &str,
            number: u64,
            body: &str,
        ) -> Result<(), ReviewError> {
            let mut state = self.inner.lock();
            state.next_comment_id += 1;
            let id = state.next_comment_id;
            state
                .comments
                .entry((org.to_string(), repo.to_string(), number))
                .or_default()
                .push(IssueComment {
                    id,
                    author: FAKE_BOT_NAME.to_string(),
                    body: body.to_string(),
                });
            Ok(())
        }

        async fn delete_comment(
            &self,
            _org: &str,
            _repo: &str,
            id: u64,
        ) -> Result<(), ReviewError> {
            let mut state = self.inner.lock();
            for comments in state.comments.values_mut() {
                comments.retain(|c| c.id != id);
            }
            state.deleted.push(id);
            Ok(())
        }

        async fn edit_comment(
            &self,
            _org: &str,
            _repo: &str,
            id: u64,
            body: &str,
        ) -> Result<(), ReviewError> {
            let mut state = self.inner.lock();
            for comments in state.comments.values_mut() {
                for comment in comments.iter_mut() {
                    if comment.id == id {
                        comment.body = body.to_string();
                    }
                }
            }
            state.edited.push(id);
            Ok(())
        }

        async fn get_pull_request_changes(
            &self,
            _org: &str,
            _repo: &str,
            number: u64,
        ) -> Result<Vec<PullChange>, ReviewError> {
            let state = self.inner.lock();
            if let Some(message) = &state.fail_changes {
                return Err(ReviewError::Api(message.clone()));
            }
            Ok(state.changes.get(&number).cloned().unwrap_or_default())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeReviewer, StatusCall, FAKE_BOT_NAME};

#[cfg(test)]
#[path = "reviewer_tests.rs"]
mod tests;
