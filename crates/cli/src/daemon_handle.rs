// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Everything the CLI knows about a running (or not-running) daemon.
//!
//! There is no IPC protocol between `dcyfr` and `dcyfrd` — they only share
//! the files under `.dcyfr/` (SPEC_FULL.md A.1). `start`/`stop` locate and
//! signal the process via its pid file; every other command just reads the
//! JSON state the daemon already writes on its own heartbeat.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use dcyfr_daemon::Config;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

/// Reads the pid recorded in `daemon.pid`, if the file exists and parses.
/// Does **not** tell you whether that pid is alive — pair with
/// [`is_alive`].
pub fn read_pid(config: &Config) -> Option<u32> {
    std::fs::read_to_string(config.pid_path()).ok()?.trim().parse().ok()
}

/// `kill(pid, 0)` — checks liveness without sending a real signal.
pub fn is_alive(pid: u32) -> bool {
    signal::kill(Pid::from_raw(pid as i32), None).is_ok()
}

pub fn is_running(config: &Config) -> Option<u32> {
    let pid = read_pid(config)?;
    is_alive(pid).then_some(pid)
}

pub fn send_terminate(pid: u32) -> Result<()> {
    signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM)
        .map_err(|errno| anyhow!("failed to signal pid {pid}: {errno}"))
}

/// Locates the `dcyfrd` binary to spawn for `dcyfr start`: first a sibling
/// of the running `dcyfr` executable (the normal installed layout), then a
/// `target/<profile>/dcyfrd` next to it in a cargo workspace checkout,
/// falling back to a bare `PATH` lookup.
pub fn find_dcyfrd_binary() -> Result<PathBuf> {
    let current_exe = std::env::current_exe().ok();

    if let Some(exe) = &current_exe {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("dcyfrd");
            if sibling.exists() {
                return Ok(sibling);
            }
        }
    }

    Ok(PathBuf::from("dcyfrd"))
}

pub fn read_daemon_state(config: &Config) -> Result<dcyfr_daemon::DaemonStateSnapshot> {
    let raw = std::fs::read_to_string(config.state_path())
        .with_context(|| format!("reading {}", config.state_path().display()))?;
    serde_json::from_str(&raw).with_context(|| "parsing daemon-state.json".to_string())
}

pub fn read_health_snapshot(config: &Config) -> Result<dcyfr_core::HealthSnapshot> {
    let raw = std::fs::read_to_string(config.health_path())
        .with_context(|| format!("reading {}", config.health_path().display()))?;
    serde_json::from_str(&raw).with_context(|| "parsing health.json".to_string())
}

#[cfg(test)]
#[path = "daemon_handle_tests.rs"]
mod tests;
