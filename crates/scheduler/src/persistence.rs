// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk override persistence (spec §4.4, §6: `schedules.json`). Stores
//! only the per-entry fields the daemon can't re-derive from the built-in
//! defaults: `lastRun`, `nextRun`, `enabled`. Write-then-rename, same
//! discipline as `dcyfr_queue::persistence` (spec §5).

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SchedulerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOverride {
    pub id: String,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OverrideFile {
    schedules: Vec<ScheduleOverride>,
}

#[derive(Clone)]
pub struct SchedulePersistence {
    path: PathBuf,
}

impl SchedulePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn save(&self, overrides: &[ScheduleOverride]) {
        if let Err(err) = self.try_save(overrides).await {
            warn!(error = %err, path = %self.path.display(), "failed to persist schedule state");
        }
    }

    async fn try_save(&self, overrides: &[ScheduleOverride]) -> Result<(), SchedulerError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = OverrideFile { schedules: overrides.to_vec() };
        let json = serde_json::to_vec_pretty(&file)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    /// Any I/O or parse failure is treated as "no overrides" (spec §7).
    pub async fn load(&self) -> Vec<ScheduleOverride> {
        match self.try_load().await {
            Ok(overrides) => overrides,
            Err(err) => {
                warn!(error = %err, path = %self.path.display(), "ignoring unreadable schedule state");
                Vec::new()
            }
        }
    }

    async fn try_load(&self) -> Result<Vec<ScheduleOverride>, SchedulerError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let file: OverrideFile = serde_json::from_slice(&bytes)?;
        Ok(file.schedules)
    }
}

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;
