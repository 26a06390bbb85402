// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `daemon-state.json`: the live heartbeat snapshot (spec §4.6, §6).
//!
//! Write-then-rename, like every other state file in this workspace (spec
//! §5 "writers SHOULD write-then-rename"). Persistence failures are logged
//! and swallowed — non-fatal per spec §7.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
enum StateFileError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct DaemonStateSnapshot {
    pub pid: u32,
    pub started_at: DateTime<Utc>,
    pub uptime_ms: i64,
    pub last_heartbeat: DateTime<Utc>,
    pub tasks_completed: u64,
    pub tasks_queued: usize,
    pub memory_usage_mb: u64,
    pub scheduler_active: bool,
    pub watcher_active: bool,
}

pub async fn save(path: &Path, snapshot: &DaemonStateSnapshot) {
    if let Err(err) = try_save(path, snapshot).await {
        warn!(error = %err, path = %path.display(), "failed to persist daemon state snapshot");
    }
}

async fn try_save(path: &Path, snapshot: &DaemonStateSnapshot) -> Result<(), StateFileError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec_pretty(snapshot)?;
    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}

#[cfg(test)]
#[path = "state_file_tests.rs"]
mod tests;
