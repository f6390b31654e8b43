// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gaffer-core: data model for the gaffer CI controller.
//!
//! Job records, build snapshots, and the small abstractions (clock, ID
//! generation) that keep the controller deterministic under test.

pub mod macros;

pub mod build;
pub mod clock;
pub mod id;
pub mod metrics;
pub mod record;

pub use build::{BuildPhase, BuildSnapshot};
pub use clock::{Clock, FakeClock, SystemClock};
#[cfg(any(test, feature = "test-support"))]
pub use id::SeqIdGen;
pub use id::{IdGen, NanoIdGen};
pub use metrics::{gather_record_metrics, RecordMetrics};
#[cfg(any(test, feature = "test-support"))]
pub use record::{JobRecordBuilder, JobSpecBuilder};
pub use record::{JobRecord, JobSpec, JobState, JobStatus, JobType, Pull, Refs, JENKINS_AGENT};
