// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dcyfr start` — spawn `dcyfrd` in the background for the current
//! workspace, unless it's already running.

use anyhow::{anyhow, Result};
use dcyfr_daemon::Config;

use crate::daemon_handle;

pub fn run(config: &Config) -> Result<()> {
    if let Some(pid) = daemon_handle::is_running(config) {
        println!("dcyfrd already running (pid {pid})");
        return Ok(());
    }

    let binary = daemon_handle::find_dcyfrd_binary()?;
    let child = std::process::Command::new(&binary)
        .arg(&config.workspace_root)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|err| anyhow!("failed to spawn {}: {err}", binary.display()))?;

    println!("dcyfrd started (pid {})", child.id());
    Ok(())
}
