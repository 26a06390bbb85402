// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory queue state: the single region serialized behind one mutex
//! (spec §5). Pure data manipulation, no I/O and no async — the owning
//! `TaskQueue` in `lib.rs` drives this from the executor loop.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use dcyfr_core::{ScannerId, Task, TaskId, TaskStatus};

/// Completion history is bounded to at most 100 entries, trimmed back to 50
/// once the cap is hit (spec §3 Task lifecycle).
const HISTORY_CAP: usize = 100;
const HISTORY_TRIM_TO: usize = 50;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    pub queued: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
    pub expired: usize,
}

#[derive(Default)]
pub struct QueueState {
    pub queued: Vec<Task>,
    pub running: HashMap<ScannerId, Task>,
    pub history: VecDeque<Task>,
    pub expired_count: usize,
}

impl QueueState {
    /// An enqueue is dropped when a queued or running task targets the same
    /// scanner with an equal file-set (spec §4.3).
    pub fn is_duplicate(&self, scanner: &ScannerId, files: &Option<Vec<PathBuf>>) -> bool {
        self.queued.iter().any(|t| t.same_scope(scanner, files))
            || self.running.values().any(|t| t.same_scope(scanner, files))
    }

    pub fn enqueue(&mut self, task: Task) {
        self.queued.push(task);
    }

    /// Age out tasks whose `(now - created_at) > ttl`, marking them expired
    /// and returning them for event emission (spec §4.3 step 1).
    pub fn expire_stale(&mut self, now: DateTime<Utc>, ttl: std::time::Duration) -> Vec<Task> {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());
        let mut expired = Vec::new();
        self.queued.retain(|task| {
            let age = now.signed_duration_since(task.created_at);
            if age > ttl {
                let mut t = task.clone();
                t.status = TaskStatus::Expired;
                t.completed_at = Some(now);
                expired.push(t);
                false
            } else {
                true
            }
        });
        self.expired_count += expired.len();
        expired
    }

    /// Pick the highest-priority queued task (lowest numeric `Priority`)
    /// whose scanner isn't already running; FIFO by enqueue time within a
    /// priority (spec §4.3 steps 2-3, §5 ordering guarantees).
    pub fn pop_next_eligible(&mut self) -> Option<Task> {
        let idx = self
            .queued
            .iter()
            .enumerate()
            .filter(|(_, t)| !self.running.contains_key(&t.scanner))
            .min_by(|(ia, a), (ib, b)| {
                a.priority.cmp(&b.priority).then_with(|| ia.cmp(ib))
            })
            .map(|(i, _)| i)?;
        Some(self.queued.remove(idx))
    }

    pub fn mark_running(&mut self, task: Task) {
        self.running.insert(task.scanner.clone(), task);
    }

    pub fn finish(&mut self, scanner: &ScannerId, task: Task) {
        self.running.remove(scanner);
        self.push_history(task);
    }

    fn push_history(&mut self, task: Task) {
        self.history.push_back(task);
        if self.history.len() > HISTORY_CAP {
            while self.history.len() > HISTORY_TRIM_TO {
                self.history.pop_front();
            }
        }
    }

    pub fn find_by_id(&self, id: TaskId) -> Option<&Task> {
        self.queued
            .iter()
            .chain(self.running.values())
            .chain(self.history.iter())
            .find(|t| t.id == id)
    }

    pub fn stats(&self) -> QueueStats {
        let mut stats = QueueStats { queued: self.queued.len(), running: self.running.len(), ..Default::default() };
        stats.expired = self.expired_count;
        for task in &self.history {
            match task.status {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Failed => stats.failed += 1,
                _ => {}
            }
        }
        stats
    }

    pub fn clear(&mut self) {
        self.queued.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.queued.is_empty() && self.running.is_empty()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
