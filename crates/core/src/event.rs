// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The in-process event bus (C1, spec §4.2).
//!
//! Pub/sub over a closed set of event kinds. Subscriptions are either
//! per-kind or global ("any"); emitting invokes all matching subscribers
//! synchronously, in registration order, within the caller's execution
//! context. A listener that panics never prevents other listeners from
//! running and never surfaces to the emitter — this is the one place in the
//! crate that deliberately swallows a panic, because a misbehaving listener
//! must not be able to take down the daemon.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DaemonStarted,
    DaemonStopping,
    DaemonStopped,
    DaemonHeartbeat,
    DaemonMemoryWarning,
    TaskQueued,
    TaskStarted,
    TaskCompleted,
    TaskFailed,
    TaskExpired,
    ScheduleTriggered,
    ScheduleUpdated,
    WatcherChange,
    WatcherError,
    ScanStarted,
    ScanCompleted,
    HealthUpdated,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::DaemonStarted => "daemon:started",
            EventKind::DaemonStopping => "daemon:stopping",
            EventKind::DaemonStopped => "daemon:stopped",
            EventKind::DaemonHeartbeat => "daemon:heartbeat",
            EventKind::DaemonMemoryWarning => "daemon:memory-warning",
            EventKind::TaskQueued => "task:queued",
            EventKind::TaskStarted => "task:started",
            EventKind::TaskCompleted => "task:completed",
            EventKind::TaskFailed => "task:failed",
            EventKind::TaskExpired => "task:expired",
            EventKind::ScheduleTriggered => "schedule:triggered",
            EventKind::ScheduleUpdated => "schedule:updated",
            EventKind::WatcherChange => "watcher:change",
            EventKind::WatcherError => "watcher:error",
            EventKind::ScanStarted => "scan:started",
            EventKind::ScanCompleted => "scan:completed",
            EventKind::HealthUpdated => "health:updated",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub data: HashMap<String, Value>,
}

impl Event {
    pub fn new(kind: EventKind, timestamp: DateTime<Utc>) -> Self {
        Self { kind, timestamp, data: HashMap::new() }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

type Listener = Box<dyn Fn(&Event) + Send + Sync>;

struct Subscription {
    id: u64,
    kind: Option<EventKind>,
    listener: Listener,
}

struct Inner {
    next_id: AtomicU64,
    subs: Mutex<Vec<Subscription>>,
}

/// Pub/sub bus. Clone is cheap (`Arc` inside); every clone shares the same
/// listener set, matching the teacher's shared-state-behind-one-mutex
/// discipline (spec §5).
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self { inner: Arc::new(Inner { next_id: AtomicU64::new(1), subs: Mutex::new(Vec::new()) }) }
    }

    /// Subscribe to one event kind.
    pub fn subscribe(
        &self,
        kind: EventKind,
        listener: impl Fn(&Event) + Send + Sync + 'static,
    ) -> Unsubscribe {
        self.push(Some(kind), listener)
    }

    /// Subscribe to every event kind ("any").
    pub fn subscribe_any(&self, listener: impl Fn(&Event) + Send + Sync + 'static) -> Unsubscribe {
        self.push(None, listener)
    }

    fn push(&self, kind: Option<EventKind>, listener: impl Fn(&Event) + Send + Sync + 'static) -> Unsubscribe {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner.subs.lock().push(Subscription { id, kind, listener: Box::new(listener) });
        Unsubscribe { id, bus: self.clone() }
    }

    fn unsubscribe(&self, id: u64) {
        self.inner.subs.lock().retain(|s| s.id != id);
    }

    /// Invoke every matching subscriber synchronously, in registration
    /// order. A panicking listener is caught and logged; it never aborts
    /// the emit or affects other listeners (spec §4.2).
    pub fn emit(&self, event: Event) {
        // Snapshot-free: subscribers are invoked while holding the lock to
        // preserve the FIFO-per-type ordering guarantee even if a listener
        // enqueues from inside the callback (re-entrant enqueue is allowed
        // per spec §4.3, but re-entrant *subscribe/unsubscribe* during an
        // emit is not supported and would deadlock — listeners must not
        // call back into subscribe/unsubscribe).
        let subs = self.inner.subs.lock();
        for sub in subs.iter() {
            if sub.kind.is_some() && sub.kind != Some(event.kind) {
                continue;
            }
            let result = catch_unwind(AssertUnwindSafe(|| (sub.listener)(&event)));
            if result.is_err() {
                warn!(event = event.kind.as_str(), "event listener panicked, continuing");
            }
        }
    }
}

/// A handle returned by `subscribe`/`subscribe_any`. Unlike RAII guards,
/// dropping it does *not* unsubscribe — call `.unsubscribe()` explicitly so
/// listener lifetime decisions stay visible at call sites (see SPEC_FULL.md
/// A.3).
pub struct Unsubscribe {
    id: u64,
    bus: EventBus,
}

impl Unsubscribe {
    pub fn unsubscribe(self) {
        self.bus.unsubscribe(self.id);
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
