// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller error types.

use gaffer_adapters::{EngineError, ReviewError, StoreError};
use thiserror::Error;

/// A per-record failure inside one reconciliation phase.
///
/// Backend submit failures are not here: those become an in-record error
/// state instead of failing the driver.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("replacing record {record}: {source}")]
    Replace {
        record: String,
        #[source]
        source: StoreError,
    },
    #[error("creating follow-up of {record}: {source}")]
    CreateFollowUp {
        record: String,
        #[source]
        source: StoreError,
    },
}

/// A failed reconciliation tick.
#[derive(Debug, Error)]
pub enum TickError {
    /// The record listing failed; nothing was mutated this tick.
    #[error("listing job records: {0}")]
    ListRecords(#[source] StoreError),
    /// The build listing failed; nothing was mutated this tick.
    #[error("listing builds: {0}")]
    ListBuilds(#[source] EngineError),
    /// The tick ran to completion but some records failed to sync or report.
    #[error("errors syncing: {sync:?}; errors reporting: {report:?}")]
    Failures {
        sync: Vec<SyncError>,
        report: Vec<ReviewError>,
    },
}
