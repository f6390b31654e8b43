// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gaffer-adapters: trait seams for the controller's external collaborators.
//!
//! The record store, the build engine, and the reviewer are capability
//! bundles the controller calls through these traits; concrete transports
//! live with the deployment, and the in-memory fakes back the test suites.

pub mod engine;
pub mod reviewer;
pub mod store;

pub use engine::{BuildEngine, EngineError};
pub use reviewer::{IssueComment, PullChange, Reviewer, ReviewError, Status, StatusState};
pub use store::{RecordStore, StoreError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use engine::FakeBuildEngine;
#[cfg(any(test, feature = "test-support"))]
pub use reviewer::{FakeReviewer, StatusCall, FAKE_BOT_NAME};
#[cfg(any(test, feature = "test-support"))]
pub use store::FakeRecordStore;
