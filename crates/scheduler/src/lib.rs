// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dcyfr-scheduler: the interval scheduler (C4, spec §4.4).
//!
//! Owns a merged set of [`ScheduleEntry`] records — a built-in defaults list
//! overlaid with persisted `lastRun`/`nextRun`/`enabled` overrides — performs
//! startup catch-up, and arms a per-entry jittered timer that re-enqueues
//! itself after every fire.

pub mod defaults;
pub mod error;
pub mod persistence;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dcyfr_core::{Clock, Event, EventBus, EventKind, Priority, ScheduleEntry, SystemClock, TaskSource};
use dcyfr_queue::TaskQueue;
use parking_lot::Mutex;
use rand::Rng;
use tokio::task::JoinHandle;

pub use error::SchedulerError;
pub use persistence::{ScheduleOverride, SchedulePersistence};

pub struct Scheduler<C: Clock = SystemClock> {
    entries: Arc<Mutex<HashMap<String, ScheduleEntry>>>,
    timers: Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
    queue: TaskQueue<C>,
    bus: EventBus,
    clock: C,
    persistence: SchedulePersistence,
    shutdown: Arc<AtomicBool>,
}

impl<C: Clock> Clone for Scheduler<C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            timers: self.timers.clone(),
            queue: self.queue.clone(),
            bus: self.bus.clone(),
            clock: self.clock.clone(),
            persistence: self.persistence.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<C: Clock> Scheduler<C> {
    pub fn new(
        queue: TaskQueue<C>,
        bus: EventBus,
        clock: C,
        persistence_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            timers: Arc::new(Mutex::new(HashMap::new())),
            queue,
            bus,
            clock,
            persistence: SchedulePersistence::new(persistence_path),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Loads the merged set, performs catch-up, then arms every enabled
    /// entry's timer (spec §4.4 "Start").
    pub async fn start(&self) {
        self.load_and_merge().await;
        self.catch_up().await;
        self.arm_all();
    }

    /// Current entries, sorted by id for deterministic reading.
    pub fn entries(&self) -> Vec<ScheduleEntry> {
        let mut out: Vec<ScheduleEntry> = self.entries.lock().values().cloned().collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    /// Arms or cancels the entry's timer immediately and persists (spec
    /// §4.4 "Enable/disable").
    pub async fn set_enabled(&self, id: &str, enabled: bool) -> Result<(), SchedulerError> {
        let existed = {
            let mut entries = self.entries.lock();
            match entries.get_mut(id) {
                Some(entry) => {
                    entry.enabled = enabled;
                    true
                }
                None => false,
            }
        };
        if !existed {
            return Err(SchedulerError::UnknownEntry(id.to_string()));
        }

        if enabled {
            self.arm(id.to_string());
        } else if let Some(handle) = self.timers.lock().remove(id) {
            handle.abort();
        }

        let now = self.clock.now();
        self.bus.emit(
            Event::new(EventKind::ScheduleUpdated, now)
                .with("id", id.to_string())
                .with("enabled", enabled),
        );
        self.persist().await;
        Ok(())
    }

    /// Cancels every armed timer. A timer that fires after this point is a
    /// no-op (spec §4.4 "a timer that fires during shutdown is dropped").
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let mut timers = self.timers.lock();
        for (_, handle) in timers.drain() {
            handle.abort();
        }
    }

    async fn load_and_merge(&self) {
        let overrides = self.persistence.load().await;
        let by_id: HashMap<String, ScheduleOverride> =
            overrides.into_iter().map(|o| (o.id.clone(), o)).collect();

        let mut entries = self.entries.lock();
        entries.clear();
        for mut entry in defaults::default_entries() {
            if let Some(over) = by_id.get(&entry.id) {
                entry.last_run = over.last_run;
                entry.next_run = over.next_run;
                entry.enabled = over.enabled;
            }
            entries.insert(entry.id.clone(), entry);
        }
    }

    /// For every enabled, overdue entry: enqueue one `LOW`-priority task and
    /// stamp `lastRun = now` (spec §4.4 "Start" / "catch-up").
    async fn catch_up(&self) {
        let now = self.clock.now();
        let due: Vec<ScheduleEntry> = {
            let mut entries = self.entries.lock();
            let mut due = Vec::new();
            for entry in entries.values_mut() {
                if entry.enabled && entry.is_overdue(now) {
                    entry.last_run = Some(now);
                    due.push(entry.clone());
                }
            }
            due
        };
        if due.is_empty() {
            return;
        }
        for entry in &due {
            self.queue.enqueue(
                entry.scanner.clone(),
                TaskSource::Scheduler,
                Priority::Low,
                None,
                entry.options.clone(),
            );
            self.bus.emit(
                Event::new(EventKind::ScheduleTriggered, now)
                    .with("id", entry.id.clone())
                    .with("priority", "low"),
            );
        }
        self.persist().await;
    }

    fn arm_all(&self) {
        let ids: Vec<String> =
            self.entries.lock().values().filter(|e| e.enabled).map(|e| e.id.clone()).collect();
        for id in ids {
            self.arm(id);
        }
    }

    /// Arms a single entry's timer at `max(nextRun - now, 0) + jitter` (spec
    /// §4.4 "Start"). Replaces any timer already armed for this id.
    fn arm(&self, id: String) {
        let now = self.clock.now();
        let delay = {
            let entries = self.entries.lock();
            match entries.get(&id) {
                Some(entry) => {
                    let base = match entry.next_run {
                        Some(next) => {
                            let millis = next.signed_duration_since(now).num_milliseconds();
                            Duration::from_millis(millis.max(0) as u64)
                        }
                        None => Duration::ZERO,
                    };
                    base + jitter(entry.interval_ms)
                }
                None => return,
            }
        };

        let scheduler = self.clone();
        let timer_id = id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            scheduler.fire(timer_id).await;
        });
        self.timers.lock().insert(id, handle);
    }

    /// Fires one entry: enqueues at `NORMAL` priority, records a new
    /// `lastRun`/`nextRun`, persists, and re-arms at `interval + jitter`
    /// (spec §4.4 "Start").
    async fn fire(&self, id: String) {
        if self.shutdown.load(Ordering::SeqCst) {
            return;
        }
        let now = self.clock.now();
        let fired = {
            let mut entries = self.entries.lock();
            match entries.get_mut(&id) {
                Some(entry) if entry.enabled => {
                    entry.last_run = Some(now);
                    entry.next_run = Some(now + chrono::Duration::milliseconds(entry.interval_ms as i64));
                    Some((entry.scanner.clone(), entry.options.clone()))
                }
                _ => None,
            }
        };
        let Some((scanner, options)) = fired else {
            return;
        };

        self.queue.enqueue(scanner, TaskSource::Scheduler, Priority::Normal, None, options);
        self.bus.emit(
            Event::new(EventKind::ScheduleTriggered, now)
                .with("id", id.clone())
                .with("priority", "normal"),
        );
        self.persist().await;

        if !self.shutdown.load(Ordering::SeqCst) {
            self.arm(id);
        }
    }

    /// Snapshots every entry to an override record and persists (spec §4.4,
    /// §6 `schedules.json`). Sorted by id so repeated saves of an unchanged
    /// set are byte-stable (spec §8 P5).
    async fn persist(&self) {
        let mut overrides: Vec<ScheduleOverride> = self
            .entries
            .lock()
            .values()
            .map(|e| ScheduleOverride {
                id: e.id.clone(),
                last_run: e.last_run,
                next_run: e.next_run,
                enabled: e.enabled,
            })
            .collect();
        overrides.sort_by(|a, b| a.id.cmp(&b.id));
        self.persistence.save(&overrides).await;
    }
}

/// Jitter is drawn from `[0, 0.1 * interval_ms)`, at least 1ms wide so
/// short-interval entries still jitter a little (spec §4.4).
fn jitter(interval_ms: u64) -> Duration {
    let upper = (interval_ms / 10).max(1);
    let ms = rand::rng().random_range(0..upper);
    Duration::from_millis(ms)
}

impl Scheduler<SystemClock> {
    pub fn with_system_clock(
        queue: TaskQueue<SystemClock>,
        bus: EventBus,
        persistence_path: impl Into<PathBuf>,
    ) -> Self {
        Self::new(queue, bus, SystemClock, persistence_path)
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
