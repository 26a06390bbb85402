// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dcyfr-queue: the priority task queue (C3, spec §4.3).
//!
//! A single-executor priority queue with at-most-one-in-flight-per-scanner
//! semantics (by default one in-flight total), deduplication/coalescing of
//! redundant requests, TTL expiration, and crash-recoverable persistence of
//! the live queued set.

pub mod error;
pub mod persistence;
pub mod state;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dcyfr_core::{
    Clock, Event, EventBus, EventKind, Priority, ScanContext, ScannerId, Status, SystemClock, Task,
    TaskId, TaskSource, TaskStatus,
};
use dcyfr_registry::ScannerRegistry;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{Notify, Semaphore};
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub use persistence::QueuePersistence;
pub use state::{QueueState, QueueStats};

/// How often the executor loop wakes up on its own (independent of enqueue
/// notifications) to re-check TTL expiration. Short enough that TTL-0 and
/// small-TTL tests don't need real sleeps beyond a tick or two.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy)]
pub struct QueueConfig {
    /// Default: 1 hour (spec §4.3).
    pub ttl: Duration,
    /// Default: 1 (spec §4.3, §5 — the executor is effectively serial).
    pub max_concurrent: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { ttl: Duration::from_secs(3600), max_concurrent: 1 }
    }
}

pub struct TaskQueue<C: Clock = SystemClock> {
    state: Arc<Mutex<QueueState>>,
    registry: ScannerRegistry,
    bus: EventBus,
    clock: C,
    persistence: QueuePersistence,
    config: QueueConfig,
    workspace_root: PathBuf,
    notify: Arc<Notify>,
    shutdown: Arc<AtomicBool>,
    semaphore: Arc<Semaphore>,
}

impl<C: Clock> Clone for TaskQueue<C> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            registry: self.registry.clone(),
            bus: self.bus.clone(),
            clock: self.clock.clone(),
            persistence: self.persistence.clone(),
            config: self.config,
            workspace_root: self.workspace_root.clone(),
            notify: self.notify.clone(),
            shutdown: self.shutdown.clone(),
            semaphore: self.semaphore.clone(),
        }
    }
}

impl<C: Clock> TaskQueue<C> {
    pub fn new(
        registry: ScannerRegistry,
        bus: EventBus,
        clock: C,
        workspace_root: impl Into<PathBuf>,
        persistence_path: impl Into<PathBuf>,
        config: QueueConfig,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState::default())),
            registry,
            bus,
            clock,
            persistence: QueuePersistence::new(persistence_path),
            config,
            workspace_root: workspace_root.into(),
            notify: Arc::new(Notify::new()),
            shutdown: Arc::new(AtomicBool::new(false)),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        }
    }

    /// Enqueue a scan request. Returns `None` when coalesced with an
    /// already-live (queued or running) request for the same scanner and
    /// file scope (spec §4.3).
    pub fn enqueue(
        &self,
        scanner: ScannerId,
        source: TaskSource,
        priority: Priority,
        files: Option<Vec<PathBuf>>,
        options: HashMap<String, Value>,
    ) -> Option<TaskId> {
        let now = self.clock.now();
        let (id, snapshot) = {
            let mut state = self.state.lock();
            if state.is_duplicate(&scanner, &files) {
                return None;
            }
            let task = Task::new(scanner.clone(), priority, source, files, options, now);
            let id = task.id;
            state.enqueue(task);
            (id, state.queued.clone())
        };
        self.bus.emit(
            Event::new(EventKind::TaskQueued, now)
                .with("scanner", scanner.to_string())
                .with("id", id.to_string()),
        );
        self.persist(snapshot);
        self.notify.notify_waiters();
        Some(id)
    }

    pub fn size(&self) -> usize {
        self.state.lock().queued.len()
    }

    pub fn stats(&self) -> QueueStats {
        self.state.lock().stats()
    }

    pub fn clear(&self) {
        self.state.lock().clear();
    }

    /// Resolves once the queue holds no running and no queued tasks.
    /// Intended to be raced against a deadline by the caller (spec §4.6
    /// stop sequence step 4).
    pub async fn drain(&self) {
        loop {
            if self.state.lock().is_idle() {
                return;
            }
            let notified = self.notify.notified();
            if self.state.lock().is_idle() {
                return;
            }
            tokio::select! {
                _ = notified => {}
                _ = tokio::time::sleep(POLL_INTERVAL) => {}
            }
        }
    }

    /// Reload persisted queued tasks that are still within TTL, preserving
    /// `created_at` so expiration stays monotonic across restarts (spec
    /// §4.3). Returns the number of tasks restored.
    pub async fn restore(&self) -> usize {
        let now = self.clock.now();
        let ttl = chrono::Duration::from_std(self.config.ttl).unwrap_or_default();
        let loaded = self.persistence.load().await;
        let mut state = self.state.lock();
        let mut restored = 0;
        for mut task in loaded {
            let age = now.signed_duration_since(task.created_at);
            if age > ttl {
                continue;
            }
            if state.is_duplicate(&task.scanner, &task.files) {
                continue;
            }
            task.status = TaskStatus::Queued;
            state.enqueue(task);
            restored += 1;
        }
        restored
    }

    fn persist(&self, snapshot: Vec<Task>) {
        let persistence = self.persistence.clone();
        let now = self.clock.now();
        tokio::spawn(async move {
            persistence.save(&snapshot, now).await;
        });
    }

    /// Signal the executor loop to stop picking up new work. Tasks already
    /// running finish normally; combine with `drain()` for a graceful stop
    /// (spec §4.6).
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Spawn the executor loop (spec §4.3 steps 1-7).
    pub fn start(&self) -> JoinHandle<()> {
        let queue = self.clone();
        tokio::spawn(async move { queue.run_executor().await })
    }

    async fn run_executor(self) {
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                return;
            }

            self.age_out_expired();

            if self.try_dispatch_next() {
                // Immediately loop again: there may be more eligible work
                // and/or more free concurrency slots.
                continue;
            }

            tokio::select! {
                _ = self.notify.notified() => {}
                _ = tokio::time::sleep(POLL_INTERVAL) => {}
            }
        }
    }

    fn age_out_expired(&self) {
        let now = self.clock.now();
        let expired = {
            let mut state = self.state.lock();
            state.expire_stale(now, self.config.ttl)
        };
        if expired.is_empty() {
            return;
        }
        for task in &expired {
            self.bus.emit(
                Event::new(EventKind::TaskExpired, now)
                    .with("scanner", task.scanner.to_string())
                    .with("id", task.id.to_string()),
            );
        }
        let snapshot = self.state.lock().queued.clone();
        self.persist(snapshot);
    }

    /// Attempt to start exactly one eligible task. Returns `true` if one
    /// was dispatched (so the caller can try again without sleeping).
    fn try_dispatch_next(&self) -> bool {
        let permit = match self.semaphore.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => return false,
        };

        let task = {
            let mut state = self.state.lock();
            state.pop_next_eligible()
        };

        let mut task = match task {
            Some(task) => task,
            None => return false, // permit dropped here, released automatically
        };

        let now = self.clock.now();
        task.status = TaskStatus::Running;
        task.started_at = Some(now);
        {
            let mut state = self.state.lock();
            state.mark_running(task.clone());
        }
        self.bus.emit(
            Event::new(EventKind::TaskStarted, now)
                .with("scanner", task.scanner.to_string())
                .with("id", task.id.to_string()),
        );
        let snapshot = self.state.lock().queued.clone();
        self.persist(snapshot);

        let queue = self.clone();
        tokio::spawn(async move {
            queue.execute(task, permit).await;
        });
        true
    }

    async fn execute(&self, mut task: Task, _permit: tokio::sync::OwnedSemaphorePermit) {
        let ctx = match &task.files {
            Some(files) => ScanContext::new(&self.workspace_root).with_files(files.clone()),
            None => ScanContext::new(&self.workspace_root),
        };

        let outcome = self.registry.run(&task.scanner, &ctx).await;
        let finished_at = self.clock.now();
        task.completed_at = Some(finished_at);

        match outcome {
            Ok(result) => {
                let duration_ms = task
                    .started_at
                    .map(|s| finished_at.signed_duration_since(s).num_milliseconds().max(0) as u64)
                    .unwrap_or(result.duration_ms);
                if result.status == Status::Error {
                    task.status = TaskStatus::Failed;
                    task.error = Some(result.summary.clone());
                    self.bus.emit(
                        Event::new(EventKind::TaskFailed, finished_at)
                            .with("scanner", task.scanner.to_string())
                            .with("error", result.summary.clone()),
                    );
                } else {
                    task.status = TaskStatus::Completed;
                    self.bus.emit(
                        Event::new(EventKind::TaskCompleted, finished_at)
                            .with("scanner", task.scanner.to_string())
                            .with("status", format!("{:?}", result.status))
                            .with("duration_ms", duration_ms as i64),
                    );
                }
                // Carries the full result (not just status) so subscribers
                // like the daemon's result cache (spec §4.6) can feed it
                // straight into the health aggregator without re-deriving it.
                let result_value = serde_json::to_value(&result).unwrap_or(Value::Null);
                self.bus.emit(
                    Event::new(EventKind::ScanCompleted, finished_at)
                        .with("scanner", task.scanner.to_string())
                        .with("status", format!("{:?}", result.status))
                        .with("result", result_value),
                );
            }
            Err(err) => {
                task.status = TaskStatus::Failed;
                task.error = Some(err.to_string());
                self.bus.emit(
                    Event::new(EventKind::TaskFailed, finished_at)
                        .with("scanner", task.scanner.to_string())
                        .with("error", err.to_string()),
                );
                warn!(scanner = %task.scanner, error = %err, "task failed before scan could run");
            }
        }

        let scanner = task.scanner.clone();
        {
            let mut state = self.state.lock();
            state.finish(&scanner, task);
        }
        let snapshot = self.state.lock().queued.clone();
        self.persist(snapshot);
        self.notify.notify_waiters();
    }
}

impl TaskQueue<SystemClock> {
    pub fn with_system_clock(
        registry: ScannerRegistry,
        bus: EventBus,
        workspace_root: impl Into<PathBuf>,
        persistence_path: impl Into<PathBuf>,
        config: QueueConfig,
    ) -> Self {
        Self::new(registry, bus, SystemClock, workspace_root, persistence_path, config)
    }
}

/// Emitted once at startup so operators can see how much was recovered.
pub fn log_restore_count(count: usize) {
    info!(count, "restored queued tasks from disk");
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
