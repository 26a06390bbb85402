// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk persistence of health state (spec §4.7, §6: `health.json`,
//! `health-history.json`). Write-then-rename, same discipline as
//! `dcyfr_queue::persistence` and `dcyfr_scheduler::persistence` (spec §5).

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use dcyfr_core::HealthSnapshot;
use tracing::warn;

use crate::error::HealthError;

#[derive(Clone)]
pub struct HealthPersistence {
    snapshot_path: PathBuf,
    history_path: PathBuf,
}

impl HealthPersistence {
    pub fn new(snapshot_path: impl Into<PathBuf>, history_path: impl Into<PathBuf>) -> Self {
        Self { snapshot_path: snapshot_path.into(), history_path: history_path.into() }
    }

    /// Persist the latest snapshot to `health.json`. Failures are logged and
    /// swallowed — the in-memory snapshot remains the source of truth.
    pub async fn save_snapshot(&self, snapshot: &HealthSnapshot) {
        if let Err(err) = write_atomic(&self.snapshot_path, snapshot).await {
            warn!(error = %err, path = %self.snapshot_path.display(), "failed to persist health snapshot");
        }
    }

    /// `saveHealthSnapshot` followed by `loadHealthSnapshot` round-trips the
    /// snapshot deep-equal to the input (spec §8 round-trip law). Any I/O or
    /// parse failure is treated as "no snapshot yet".
    pub async fn load_snapshot(&self) -> Option<HealthSnapshot> {
        match read_json(&self.snapshot_path).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, path = %self.snapshot_path.display(), "ignoring unreadable health snapshot");
                None
            }
        }
    }

    /// Persist the full rolling history to `health-history.json`.
    pub async fn save_history(&self, history: &[HealthSnapshot]) {
        if let Err(err) = write_atomic(&self.history_path, &history.to_vec()).await {
            warn!(error = %err, path = %self.history_path.display(), "failed to persist health history");
        }
    }

    /// Any I/O or parse failure is treated as an empty history (spec §7).
    pub async fn load_history(&self) -> Vec<HealthSnapshot> {
        match read_json::<Vec<HealthSnapshot>>(&self.history_path).await {
            Ok(Some(history)) => history,
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, path = %self.history_path.display(), "ignoring unreadable health history");
                Vec::new()
            }
        }
    }
}

async fn write_atomic(path: &PathBuf, value: &impl serde::Serialize) -> Result<(), HealthError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec_pretty(value)?;
    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<Option<T>, HealthError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Drops every entry older than `retention` relative to `now` (spec §4.7
/// "trim the history to entries within the retention window").
pub fn prune(history: &mut Vec<HealthSnapshot>, now: DateTime<Utc>, retention: chrono::Duration) {
    let cutoff = now - retention;
    history.retain(|snapshot| snapshot.timestamp >= cutoff);
}

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;
