// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process supervisor (C6, spec §4.6).
//!
//! Wires the event bus, registry, queue, scheduler, and watcher together
//! (each depending only on the ones built before it, per spec §4.6
//! "Wiring" and the "Cyclic ownership risk" design note), enforces the
//! single-instance invariant, and drives the heartbeat/drain/log-rotation
//! machinery described in §4.6-§4.8.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use dcyfr_core::{Event, EventBus, EventKind, SystemClock, Unsubscribe};
use dcyfr_health::{HealthAggregator, HealthConfig};
use dcyfr_queue::{QueueConfig, TaskQueue};
use dcyfr_registry::ScannerRegistry;
use dcyfr_scheduler::Scheduler;
use dcyfr_watcher::{FileWatcher, WatcherConfig};
use parking_lot::Mutex;
use sysinfo::{Pid, System};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::LifecycleError;
use crate::pidfile::{self, PidLock};
use crate::result_cache::ResultCache;
use crate::state_file::{self, DaemonStateSnapshot};
use crate::{defaults, log_rotation};

pub struct Supervisor {
    config: Config,
    pid_lock: PidLock,
    bus: EventBus,
    queue: TaskQueue<SystemClock>,
    scheduler: Scheduler<SystemClock>,
    watcher: FileWatcher<SystemClock>,
    health: HealthAggregator<SystemClock>,
    result_cache: ResultCache,
    start_time: Instant,
    started_at: chrono::DateTime<Utc>,
    tasks_completed: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    stopping_once: Arc<AtomicBool>,
    heartbeat_handle: Mutex<Option<JoinHandle<()>>>,
    log_guard: Mutex<Option<tracing_appender::non_blocking::WorkerGuard>>,
    listener_handles: Mutex<Vec<Unsubscribe>>,
}

impl Supervisor {
    /// Acquires the single-instance lock, builds every component (spec
    /// §4.6 "Wiring"), restores persisted queue/health state, subscribes
    /// the logging/result-cache listeners, and starts the scheduler,
    /// watcher, and queue executor. Does *not* install signal handlers or
    /// start the heartbeat — callers (normally the `dcyfrd` binary) do
    /// that once they also hold the returned `Arc<Supervisor>`.
    pub async fn start(
        config: Config,
        registry: ScannerRegistry,
        health_config: HealthConfig,
    ) -> Result<Arc<Self>, LifecycleError> {
        let pid_lock = pidfile::acquire(&config.state_dir, &config.pid_path())?;

        let log_guard = match crate::logging::init(&config.log_path()) {
            Ok(guard) => Some(guard),
            Err(err) => {
                warn!(error = %err, "failed to initialize file logging, continuing with defaults");
                None
            }
        };

        let bus = EventBus::new();
        let queue_config = QueueConfig { ttl: config.queue_ttl, max_concurrent: config.max_concurrent };
        let queue = TaskQueue::with_system_clock(
            registry,
            bus.clone(),
            config.workspace_root.clone(),
            config.queue_path(),
            queue_config,
        );

        let restored = queue.restore().await;
        dcyfr_queue::log_restore_count(restored);

        let scheduler = Scheduler::with_system_clock(queue.clone(), bus.clone(), config.schedules_path());

        let watcher_config = WatcherConfig {
            roots: Vec::new(),
            ignore: crate::config::default_ignore_list(),
            default_debounce_ms: 500,
        };
        let watcher = FileWatcher::with_system_clock(
            config.workspace_root.clone(),
            defaults::default_rules(),
            watcher_config,
            queue.clone(),
            bus.clone(),
        );

        let health = HealthAggregator::with_system_clock(
            health_config,
            bus.clone(),
            config.health_path(),
            config.health_history_path(),
        );
        let restored_health = health.restore().await;
        info!(count = restored_health, "restored health history from disk");

        let result_cache = ResultCache::new();
        let tasks_completed = Arc::new(AtomicU64::new(0));

        let supervisor = Arc::new(Self {
            config,
            pid_lock,
            bus: bus.clone(),
            queue: queue.clone(),
            scheduler: scheduler.clone(),
            watcher: watcher.clone(),
            health,
            result_cache: result_cache.clone(),
            start_time: Instant::now(),
            started_at: Utc::now(),
            tasks_completed: tasks_completed.clone(),
            running: Arc::new(AtomicBool::new(true)),
            stopping_once: Arc::new(AtomicBool::new(false)),
            heartbeat_handle: Mutex::new(None),
            log_guard: Mutex::new(log_guard),
            listener_handles: Mutex::new(Vec::new()),
        });

        supervisor.install_listeners();

        queue.start();
        scheduler.start().await;
        if let Err(err) = watcher.start() {
            warn!(error = %err, "failed to start file watcher, continuing without it");
        }

        bus.emit(Event::new(EventKind::DaemonStarted, Utc::now()).with("pid", std::process::id()));
        info!(pid = std::process::id(), "daemon started");

        let heartbeat = supervisor.clone().spawn_heartbeat();
        *supervisor.heartbeat_handle.lock() = Some(heartbeat);

        Ok(supervisor)
    }

    /// Subscribes logging + scan-result-capture + lifecycle-counter
    /// listeners (spec §4.6 "Subscribe event listeners for logging ...,
    /// scan-result capture ..., and memory monitoring").
    fn install_listeners(self: &Arc<Self>) {
        let mut handles = Vec::new();

        let tasks_completed = self.tasks_completed.clone();
        handles.push(self.bus.subscribe(EventKind::TaskCompleted, move |event| {
            tasks_completed.fetch_add(1, Ordering::Relaxed);
            info!(scanner = ?event.data.get("scanner"), status = ?event.data.get("status"), "task completed");
        }));

        handles.push(self.bus.subscribe(EventKind::TaskQueued, |event| {
            info!(scanner = ?event.data.get("scanner"), "task queued");
        }));
        handles.push(self.bus.subscribe(EventKind::TaskStarted, |event| {
            info!(scanner = ?event.data.get("scanner"), "task started");
        }));
        handles.push(self.bus.subscribe(EventKind::TaskFailed, |event| {
            warn!(scanner = ?event.data.get("scanner"), error = ?event.data.get("error"), "task failed");
        }));
        handles.push(self.bus.subscribe(EventKind::TaskExpired, |event| {
            warn!(scanner = ?event.data.get("scanner"), "task expired");
        }));
        handles.push(self.bus.subscribe(EventKind::ScheduleTriggered, |event| {
            info!(id = ?event.data.get("id"), "schedule triggered");
        }));
        handles.push(self.bus.subscribe(EventKind::WatcherChange, |event| {
            info!(path = ?event.data.get("path"), "watcher change");
        }));
        handles.push(self.bus.subscribe(EventKind::WatcherError, |event| {
            warn!(error = ?event.data.get("error"), "watcher error");
        }));

        let result_cache = self.result_cache.clone();
        handles.push(self.bus.subscribe(EventKind::ScanCompleted, move |event| {
            let Some(value) = event.data.get("result") else { return };
            match serde_json::from_value(value.clone()) {
                Ok(result) => result_cache.record(result),
                Err(err) => warn!(error = %err, "failed to decode scan result for health cache"),
            }
        }));

        *self.listener_handles.lock() = handles;
    }

    /// Spawns the periodic heartbeat (spec §4.6 "Heartbeat"): emits
    /// `daemon:heartbeat`, writes `daemon-state.json`, checks log rotation,
    /// watches memory usage, and rolls up a fresh health snapshot.
    fn spawn_heartbeat(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.config.heartbeat_interval);
            loop {
                interval.tick().await;
                if !self.running.load(Ordering::SeqCst) {
                    return;
                }
                self.heartbeat_tick().await;
            }
        })
    }

    async fn heartbeat_tick(&self) {
        let now = Utc::now();
        let memory_mb = current_memory_mb();

        let snapshot = DaemonStateSnapshot {
            pid: std::process::id(),
            started_at: self.started_at,
            uptime_ms: self.start_time.elapsed().as_millis() as i64,
            last_heartbeat: now,
            tasks_completed: self.tasks_completed.load(Ordering::Relaxed),
            tasks_queued: self.queue.size(),
            memory_usage_mb: memory_mb,
            scheduler_active: self.running.load(Ordering::SeqCst),
            watcher_active: self.running.load(Ordering::SeqCst),
        };

        self.bus.emit(
            Event::new(EventKind::DaemonHeartbeat, now)
                .with("pid", snapshot.pid)
                .with("uptime_ms", snapshot.uptime_ms)
                .with("tasks_queued", snapshot.tasks_queued as i64)
                .with("tasks_completed", snapshot.tasks_completed as i64)
                .with("memory_usage_mb", snapshot.memory_usage_mb as i64),
        );

        state_file::save(&self.config.state_path(), &snapshot).await;
        log_rotation::rotate_if_needed(
            &self.config.log_path(),
            self.config.max_log_bytes,
            self.config.log_rotate_count,
        );

        if memory_mb >= self.config.memory_warning_mb {
            self.bus.emit(
                Event::new(EventKind::DaemonMemoryWarning, now).with("memory_usage_mb", memory_mb as i64),
            );
            warn!(memory_usage_mb = memory_mb, "daemon memory usage above warning threshold");
        }

        let results = self.result_cache.snapshot();
        let workspace = dcyfr_core::WorkspaceHealth {
            packages: 0,
            last_scan_duration_ms: results.iter().map(|r| r.duration_ms).max().unwrap_or(0),
        };
        self.health.record(&results, workspace).await;
    }

    /// Graceful drain (spec §4.6 "Stop sequence"). Safe to call more than
    /// once — only the first call performs the sequence; subsequent calls
    /// return immediately, matching "Every handler invokes the stop
    /// sequence exactly once (re-entrant safe)".
    pub async fn shutdown(&self) {
        if self.stopping_once.swap(true, Ordering::SeqCst) {
            return;
        }

        self.bus.emit(Event::new(EventKind::DaemonStopping, Utc::now()));
        self.running.store(false, Ordering::SeqCst);
        info!("daemon stopping");

        self.scheduler.stop();
        self.watcher.stop();

        self.queue.stop();
        let drained = tokio::time::timeout(self.config.drain_timeout, self.queue.drain()).await;
        if drained.is_err() {
            warn!(timeout_ms = self.config.drain_timeout.as_millis() as u64, "drain deadline elapsed with tasks still in flight");
        }

        let results = self.result_cache.snapshot();
        let workspace = dcyfr_core::WorkspaceHealth {
            packages: 0,
            last_scan_duration_ms: results.iter().map(|r| r.duration_ms).max().unwrap_or(0),
        };
        self.health.record(&results, workspace).await;

        if let Some(handle) = self.heartbeat_handle.lock().take() {
            handle.abort();
        }

        let handles: Vec<Unsubscribe> = self.listener_handles.lock().drain(..).collect();
        for handle in handles {
            handle.unsubscribe();
        }

        self.pid_lock.remove();

        self.bus.emit(Event::new(EventKind::DaemonStopped, Utc::now()));
        info!("daemon stopped");

        // Flush buffered log lines before the guard (and process) goes away.
        self.log_guard.lock().take();
    }

    pub fn queue(&self) -> &TaskQueue<SystemClock> {
        &self.queue
    }

    pub fn scheduler(&self) -> &Scheduler<SystemClock> {
        &self.scheduler
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn health(&self) -> &HealthAggregator<SystemClock> {
        &self.health
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Current process RSS in megabytes, via `sysinfo` (spec §4.6 "memory
/// used"). Returns 0 if the current process can't be found, which only
/// suppresses the memory-warning check rather than failing the heartbeat.
fn current_memory_mb() -> u64 {
    let mut system = System::new();
    let pid = Pid::from_u32(std::process::id());
    system.refresh_processes(sysinfo::ProcessesToUpdate::Some(&[pid]), true);
    system.process(pid).map(|p| p.memory() / (1024 * 1024)).unwrap_or(0)
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
