// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dcyfr-watcher: the reactive file watcher (C5, spec §4.5).
//!
//! Wraps the OS filesystem notifier behind an async channel (mirroring the
//! teacher's `create_file_watcher` pattern of a `notify::recommended_watcher`
//! feeding a channel), then matches each changed path against the
//! workspace's [`WatcherRule`]s and maintains one debounced batch per rule's
//! batch key.

pub mod error;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dcyfr_core::{
    Clock, Event, EventBus, EventKind, Priority, ScannerId, SystemClock, TaskSource, WatcherRule,
};
use dcyfr_queue::TaskQueue;
use notify::{RecommendedWatcher, RecursiveMode, Watcher as _};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use error::WatcherError;

#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Roots to watch. Empty means "the workspace root only".
    pub roots: Vec<PathBuf>,
    /// Substrings of a workspace-relative path that exclude it from rule
    /// matching (spec §4.5 "a configurable ignore list"). `.dcyfr/`, the
    /// daemon's own state directory, is always ignored regardless of this
    /// list, or every state write would retrigger the watcher.
    pub ignore: Vec<String>,
    pub default_debounce_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self { roots: Vec::new(), ignore: Vec::new(), default_debounce_ms: 500 }
    }
}

struct Batch {
    files: HashSet<PathBuf>,
    scanners: BTreeSet<ScannerId>,
    timer: JoinHandle<()>,
}

pub struct FileWatcher<C: Clock = SystemClock> {
    rules: Arc<Vec<WatcherRule>>,
    config: WatcherConfig,
    workspace_root: PathBuf,
    queue: TaskQueue<C>,
    bus: EventBus,
    clock: C,
    batches: Arc<Mutex<HashMap<String, Batch>>>,
    handle: Arc<Mutex<Option<RecommendedWatcher>>>,
    shutdown: Arc<AtomicBool>,
}

impl<C: Clock> Clone for FileWatcher<C> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            config: self.config.clone(),
            workspace_root: self.workspace_root.clone(),
            queue: self.queue.clone(),
            bus: self.bus.clone(),
            clock: self.clock.clone(),
            batches: self.batches.clone(),
            handle: self.handle.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<C: Clock> FileWatcher<C> {
    pub fn new(
        workspace_root: impl Into<PathBuf>,
        rules: Vec<WatcherRule>,
        config: WatcherConfig,
        queue: TaskQueue<C>,
        bus: EventBus,
        clock: C,
    ) -> Self {
        Self {
            rules: Arc::new(rules),
            config,
            workspace_root: workspace_root.into(),
            queue,
            bus,
            clock,
            batches: Arc::new(Mutex::new(HashMap::new())),
            handle: Arc::new(Mutex::new(None)),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts the OS watcher and the background dispatch loop. Each
    /// received filesystem event is matched against every rule; matching
    /// rules accumulate into a debounced batch (spec §4.5).
    pub fn start(&self) -> Result<(), WatcherError> {
        let (tx, rx) = mpsc::channel::<notify::Event>(256);
        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

        let roots = if self.config.roots.is_empty() {
            vec![self.workspace_root.clone()]
        } else {
            self.config.roots.clone()
        };
        for root in &roots {
            watcher.watch(root, RecursiveMode::Recursive)?;
        }
        *self.handle.lock() = Some(watcher);

        let fw = self.clone();
        tokio::spawn(async move { fw.run(rx).await });
        Ok(())
    }

    /// Cancels every open debounce timer and closes the OS watcher (spec
    /// §4.5 "Cancellation on stop").
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        *self.handle.lock() = None;
        let mut batches = self.batches.lock();
        for (_, batch) in batches.drain() {
            batch.timer.abort();
        }
    }

    async fn run(&self, mut rx: mpsc::Receiver<notify::Event>) {
        while let Some(event) = rx.recv().await {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            for path in &event.paths {
                self.handle_path(path);
            }
        }
    }

    fn handle_path(&self, path: &Path) {
        let relative = self.normalize(path);
        if self.is_ignored(&relative) {
            return;
        }

        let now = self.clock.now();
        self.bus.emit(Event::new(EventKind::WatcherChange, now).with("path", relative.clone()));

        for rule in self.rules.iter() {
            if rule.matches(&relative) {
                self.add_to_batch(rule, PathBuf::from(&relative));
            }
        }
    }

    fn normalize(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.workspace_root).unwrap_or(path);
        rel.to_string_lossy().replace('\\', "/")
    }

    fn is_ignored(&self, relative: &str) -> bool {
        if relative.starts_with(".dcyfr/") || relative.contains("/.dcyfr/") {
            return true;
        }
        self.config.ignore.iter().any(|pattern| relative.contains(pattern.as_str()))
    }

    fn add_to_batch(&self, rule: &WatcherRule, path: PathBuf) {
        let key = rule.batch_key();
        let debounce = Duration::from_millis(rule.debounce_ms.unwrap_or(self.config.default_debounce_ms));

        let mut files = {
            let mut batches = self.batches.lock();
            match batches.remove(&key) {
                Some(existing) => {
                    existing.timer.abort();
                    existing.files
                }
                None => HashSet::new(),
            }
        };
        files.insert(path);

        let fw = self.clone();
        let timer_key = key.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            fw.fire_batch(timer_key).await;
        });

        self.batches.lock().insert(key, Batch { files, scanners: rule.scanners.clone(), timer });
    }

    /// Enqueues one task per scanner in the batch's key, `source=watcher`,
    /// priority `HIGH`, carrying the accumulated file list (spec §4.5).
    async fn fire_batch(&self, key: String) {
        if self.shutdown.load(Ordering::SeqCst) {
            return;
        }
        let batch = self.batches.lock().remove(&key);
        let Some(batch) = batch else {
            return;
        };
        let files: Vec<PathBuf> = batch.files.into_iter().collect();
        for scanner in &batch.scanners {
            self.queue.enqueue(
                scanner.clone(),
                TaskSource::Watcher,
                Priority::High,
                Some(files.clone()),
                HashMap::new(),
            );
        }
    }
}

impl FileWatcher<SystemClock> {
    pub fn with_system_clock(
        workspace_root: impl Into<PathBuf>,
        rules: Vec<WatcherRule>,
        config: WatcherConfig,
        queue: TaskQueue<SystemClock>,
        bus: EventBus,
    ) -> Self {
        Self::new(workspace_root, rules, config, queue, bus, SystemClock)
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
