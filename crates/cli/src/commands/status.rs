// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dcyfr status` — plain-text summary of `daemon-state.json` and
//! `health.json`. No dashboards/sparklines (SPEC_FULL.md A.1 Non-goals).

use anyhow::Result;
use chrono::Utc;
use dcyfr_daemon::Config;

use crate::daemon_handle;

pub fn run(config: &Config) -> Result<()> {
    let Some(pid) = daemon_handle::is_running(config) else {
        println!("Status: not running");
        return Ok(());
    };

    println!("Status: running (pid {pid})");

    match daemon_handle::read_daemon_state(config) {
        Ok(state) => {
            let uptime = Utc::now().signed_duration_since(state.started_at);
            println!("Uptime: {}", format_duration(uptime.num_seconds().max(0)));
            println!("Tasks queued: {}", state.tasks_queued);
            println!("Tasks completed: {}", state.tasks_completed);
            println!("Memory: {} MB", state.memory_usage_mb);
        }
        Err(err) => println!("(daemon-state.json unavailable yet: {err})"),
    }

    match daemon_handle::read_health_snapshot(config) {
        Ok(health) => {
            println!(
                "Health: {:?} ({:.1}/100, {} scanners tracked)",
                health.overall.status,
                health.overall.score,
                health.scanners.len()
            );
        }
        Err(err) => println!("(health.json unavailable yet: {err})"),
    }

    Ok(())
}

fn format_duration(total_secs: i64) -> String {
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    if hours > 0 {
        format!("{hours}h {mins}m {secs}s")
    } else if mins > 0 {
        format!("{mins}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
