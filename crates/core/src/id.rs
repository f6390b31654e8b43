// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID generation for controller-created records.
//!
//! Follow-up records need store-unique names. Production uses nanoid-backed
//! random names; tests swap in [`SeqIdGen`] for stable assertions.

/// Generates record names.
pub trait IdGen: Send + Sync {
    fn next(&self) -> String;
}

/// Random record names in the form `rec-{nanoid}`.
#[derive(Clone, Copy, Default)]
pub struct NanoIdGen;

impl IdGen for NanoIdGen {
    fn next(&self) -> String {
        format!("rec-{}", nanoid::nanoid!(19))
    }
}

/// Sequential record names (`rec-1`, `rec-2`, ...) for tests.
#[cfg(any(test, feature = "test-support"))]
pub struct SeqIdGen {
    counter: std::sync::atomic::AtomicU64,
}

#[cfg(any(test, feature = "test-support"))]
impl SeqIdGen {
    pub fn new() -> Self {
        Self { counter: std::sync::atomic::AtomicU64::new(0) }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Default for SeqIdGen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl IdGen for SeqIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        format!("rec-{}", n + 1)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
