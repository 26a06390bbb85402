// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dcyfr-health: the workspace health aggregator (C7, spec §4.7).
//!
//! [`aggregate::build`] is a pure transform from `ScanResult`s to a
//! `HealthSnapshot`; [`HealthAggregator`] wraps it with the statefulness a
//! daemon needs: a retained rolling history, on-disk persistence, and an
//! `health:updated` event on every recompute.

pub mod aggregate;
pub mod error;
pub mod persistence;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration as ChronoDuration;
use dcyfr_core::{Clock, Event, EventBus, EventKind, HealthSnapshot, ScanResult, ScannerId, SystemClock, WorkspaceHealth};
use parking_lot::Mutex;

pub use error::HealthError;
pub use persistence::HealthPersistence;

/// Default retention window for `health-history.json` (spec §4.7).
pub const DEFAULT_RETENTION_DAYS: i64 = 90;

#[derive(Clone)]
pub struct HealthConfig {
    pub weights: HashMap<ScannerId, u32>,
    pub retention: ChronoDuration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self { weights: HashMap::new(), retention: ChronoDuration::days(DEFAULT_RETENTION_DAYS) }
    }
}

pub struct HealthAggregator<C: Clock = SystemClock> {
    config: HealthConfig,
    clock: C,
    bus: EventBus,
    persistence: HealthPersistence,
    history: Arc<Mutex<Vec<HealthSnapshot>>>,
}

impl<C: Clock> Clone for HealthAggregator<C> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            clock: self.clock.clone(),
            bus: self.bus.clone(),
            persistence: self.persistence.clone(),
            history: self.history.clone(),
        }
    }
}

impl<C: Clock> HealthAggregator<C> {
    pub fn new(
        config: HealthConfig,
        bus: EventBus,
        clock: C,
        snapshot_path: impl Into<PathBuf>,
        history_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            clock,
            bus,
            persistence: HealthPersistence::new(snapshot_path, history_path),
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Loads the persisted history into memory. Returns the number of
    /// entries restored.
    pub async fn restore(&self) -> usize {
        let history = self.persistence.load_history().await;
        let count = history.len();
        *self.history.lock() = history;
        count
    }

    /// Recomputes the snapshot from the given results (one per scanner, the
    /// caller's latest-result cache), appends it to the history, prunes
    /// entries outside the retention window, persists both files, and emits
    /// `health:updated`.
    pub async fn record(&self, results: &[ScanResult], workspace: WorkspaceHealth) -> HealthSnapshot {
        let now = self.clock.now();
        let snapshot = aggregate::build(results, &self.config.weights, workspace, now);

        let history_snapshot = {
            let mut history = self.history.lock();
            history.push(snapshot.clone());
            persistence::prune(&mut history, now, self.config.retention);
            history.clone()
        };

        self.persistence.save_snapshot(&snapshot).await;
        self.persistence.save_history(&history_snapshot).await;

        self.bus.emit(
            Event::new(EventKind::HealthUpdated, now)
                .with("score", snapshot.overall.score)
                .with("status", format!("{:?}", snapshot.overall.status)),
        );

        snapshot
    }

    /// The most recently recorded snapshot, if any.
    pub fn latest(&self) -> Option<HealthSnapshot> {
        self.history.lock().last().cloned()
    }

    /// The retained history, oldest first.
    pub fn history(&self) -> Vec<HealthSnapshot> {
        self.history.lock().clone()
    }
}

impl HealthAggregator<SystemClock> {
    pub fn with_system_clock(
        config: HealthConfig,
        bus: EventBus,
        snapshot_path: impl Into<PathBuf>,
        history_path: impl Into<PathBuf>,
    ) -> Self {
        Self::new(config, bus, SystemClock, snapshot_path, history_path)
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
