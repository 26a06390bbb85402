// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Keeps the latest [`ScanResult`] per scanner (spec §4.6 "scan-result
//! capture ... keep the latest result per scanner in a small cache"). Feeds
//! [`dcyfr_health::HealthAggregator::record`] on every heartbeat.

use std::collections::HashMap;
use std::sync::Arc;

use dcyfr_core::{ScanResult, ScannerId};
use parking_lot::Mutex;

#[derive(Clone, Default)]
pub struct ResultCache {
    inner: Arc<Mutex<HashMap<ScannerId, ScanResult>>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, result: ScanResult) {
        self.inner.lock().insert(result.scanner.clone(), result);
    }

    /// Snapshot of every cached result, in no particular order — the health
    /// aggregator treats the input as a set (spec §4.7).
    pub fn snapshot(&self) -> Vec<ScanResult> {
        self.inner.lock().values().cloned().collect()
    }
}

#[cfg(test)]
#[path = "result_cache_tests.rs"]
mod tests;
