// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ambient configuration (spec.md §6, SPEC_FULL.md A.2).
//!
//! Resolves the `.dcyfr/` state directory and the handful of daemon
//! tunables from environment variables with built-in defaults, the way the
//! teacher's `daemon/src/env.rs` resolves `OJ_STATE_DIR`. This is
//! deliberately not a schema-validated config *file* loader — that surface
//! is named out of scope in spec.md §1.

use std::path::PathBuf;
use std::time::Duration;

/// Default state-directory name, always ignored by the watcher (spec §6).
pub const STATE_DIR_NAME: &str = ".dcyfr";

#[derive(Debug, Clone)]
pub struct Config {
    pub workspace_root: PathBuf,
    pub state_dir: PathBuf,
    pub heartbeat_interval: Duration,
    pub drain_timeout: Duration,
    pub max_log_bytes: u64,
    pub log_rotate_count: u32,
    pub memory_warning_mb: u64,
    pub queue_ttl: Duration,
    pub max_concurrent: usize,
}

impl Config {
    /// Resolve configuration for a workspace root. `DCYFR_STATE_DIR`
    /// overrides the default `<workspace_root>/.dcyfr`; every other tunable
    /// has an `env_var` / default pair below.
    pub fn load(workspace_root: impl Into<PathBuf>) -> Self {
        let workspace_root = workspace_root.into();
        let state_dir = std::env::var("DCYFR_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| workspace_root.join(STATE_DIR_NAME));

        Self {
            workspace_root,
            state_dir,
            heartbeat_interval: env_duration_ms("DCYFR_HEARTBEAT_MS", 60_000),
            drain_timeout: env_duration_ms("DCYFR_DRAIN_TIMEOUT_MS", 10_000),
            max_log_bytes: env_u64("DCYFR_MAX_LOG_BYTES", 10 * 1024 * 1024),
            log_rotate_count: env_u32("DCYFR_LOG_ROTATE_COUNT", 5),
            memory_warning_mb: env_u64("DCYFR_MEMORY_WARNING_MB", 512),
            queue_ttl: env_duration_ms("DCYFR_QUEUE_TTL_MS", 3_600_000),
            max_concurrent: env_u32("DCYFR_MAX_CONCURRENT", 1) as usize,
        }
    }

    pub fn pid_path(&self) -> PathBuf {
        self.state_dir.join("daemon.pid")
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join("daemon.log")
    }

    pub fn state_path(&self) -> PathBuf {
        self.state_dir.join("daemon-state.json")
    }

    pub fn queue_path(&self) -> PathBuf {
        self.state_dir.join("queue.json")
    }

    pub fn schedules_path(&self) -> PathBuf {
        self.state_dir.join("schedules.json")
    }

    pub fn health_path(&self) -> PathBuf {
        self.state_dir.join("health.json")
    }

    pub fn health_history_path(&self) -> PathBuf {
        self.state_dir.join("health-history.json")
    }

    /// Always ignore the state directory itself so writing a state file
    /// never re-triggers the watcher (spec §6).
    pub fn is_state_path(&self, workspace_relative: &str) -> bool {
        let name = self.state_dir.file_name().and_then(|n| n.to_str()).unwrap_or(STATE_DIR_NAME);
        workspace_relative.starts_with(&format!("{name}/")) || workspace_relative == name
    }
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Workspace-relative ignore list the watcher always applies in addition to
/// any rule-specific ignores (spec §6 "Ignored files (watcher default)").
pub fn default_ignore_list() -> Vec<String> {
    vec![
        "target/".to_string(),
        "node_modules/".to_string(),
        ".git/".to_string(),
        "dist/".to_string(),
        "build/".to_string(),
        ".cache/".to_string(),
    ]
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
