// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk persistence of the live queued set (spec §4.3, §6: `queue.json`).
//!
//! Writers write to a sibling temp file and rename into place so readers
//! never observe a torn write (spec §5 shared-resource policy). Corrupt or
//! unparsable state is treated as if the file were absent (spec §7).

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use dcyfr_core::Task;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::QueueError;

#[derive(Debug, Serialize, Deserialize)]
struct QueueFile {
    queue: Vec<Task>,
    last_updated: DateTime<Utc>,
}

#[derive(Clone)]
pub struct QueuePersistence {
    path: PathBuf,
}

impl QueuePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persist the given queued tasks. Failures are logged and swallowed —
    /// the in-memory queue remains the source of truth (spec §4.3, §7).
    pub async fn save(&self, tasks: &[Task], now: DateTime<Utc>) {
        if let Err(err) = self.try_save(tasks, now).await {
            warn!(error = %err, path = %self.path.display(), "failed to persist queue state");
        }
    }

    async fn try_save(&self, tasks: &[Task], now: DateTime<Utc>) -> Result<(), QueueError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = QueueFile { queue: tasks.to_vec(), last_updated: now };
        let json = serde_json::to_vec_pretty(&file)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    /// Load the persisted queued set. Any I/O or parse failure is treated
    /// as an absent file: an empty list is returned (spec §7 "corrupt
    /// on-disk state").
    pub async fn load(&self) -> Vec<Task> {
        match self.try_load().await {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(error = %err, path = %self.path.display(), "ignoring unreadable queue state");
                Vec::new()
            }
        }
    }

    async fn try_load(&self) -> Result<Vec<Task>, QueueError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let file: QueueFile = serde_json::from_slice(&bytes)?;
        Ok(file.queue)
    }
}

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;
