// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Task`, the queue's unit of work (spec §3).

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::scanner::ScannerId;

pub type TaskId = Uuid;

/// Lower numeric value runs first (spec §4.3 priority order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical = 0,
    High = 1,
    Normal = 2,
    Low = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskSource {
    Scheduler,
    Watcher,
    Cli,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub scanner: ScannerId,
    pub priority: Priority,
    pub source: TaskSource,
    pub files: Option<Vec<PathBuf>>,
    pub options: HashMap<String, Value>,
    pub created_at: DateTime<Utc>,
    pub status: TaskStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Task {
    pub fn new(
        scanner: ScannerId,
        priority: Priority,
        source: TaskSource,
        files: Option<Vec<PathBuf>>,
        options: HashMap<String, Value>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            scanner,
            priority,
            source,
            files,
            options,
            created_at,
            status: TaskStatus::Queued,
            started_at: None,
            completed_at: None,
            error: None,
        }
    }

    /// Two tasks are duplicates of each other for coalescing purposes
    /// (spec §4.3) when they target the same scanner with the same
    /// file-scope (multiset-equivalent comparison; both-absent is equal).
    pub fn same_scope(&self, scanner: &ScannerId, files: &Option<Vec<PathBuf>>) -> bool {
        if &self.scanner != scanner {
            return false;
        }
        match (&self.files, files) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                let mut a = a.clone();
                let mut b = b.clone();
                a.sort();
                b.sort();
                a == b
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
