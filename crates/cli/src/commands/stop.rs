// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dcyfr stop` — signal a running `dcyfrd` to drain and exit (spec §4.6
//! "Signals": SIGTERM/SIGINT both trigger the same graceful stop sequence).

use std::time::Duration;

use anyhow::Result;
use dcyfr_daemon::Config;

use crate::daemon_handle;

pub async fn run(config: &Config) -> Result<()> {
    let Some(pid) = daemon_handle::is_running(config) else {
        println!("dcyfrd not running");
        return Ok(());
    };

    daemon_handle::send_terminate(pid)?;

    // Give the drain/shutdown sequence a chance to remove the pid file
    // before reporting back; this is not a synchronization guarantee, just
    // a short grace period so "dcyfr stop" usually reports the true
    // outcome instead of "still running" by a race.
    for _ in 0..20 {
        if daemon_handle::is_running(config).is_none() {
            println!("dcyfrd stopped");
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    println!("sent SIGTERM to pid {pid}, still draining");
    Ok(())
}
