// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dcyfr schedule enable|disable <id>` — flip the persisted `enabled`
//! override in `schedules.json`.
//!
//! There is no IPC channel to call `Scheduler::set_enabled` on a live
//! `dcyfrd` (SPEC_FULL.md A.1), so this edits the same override file the
//! running scheduler itself writes to (`dcyfr_scheduler::persistence`) —
//! the change is picked up the next time the scheduler loads and merges
//! overrides, i.e. on the daemon's next start. A daemon running right now
//! keeps whatever arm/disarm state it already has until restarted; this
//! is surfaced to the operator rather than silently implied.

use anyhow::Result;
use dcyfr_daemon::Config;
use dcyfr_scheduler::{ScheduleOverride, SchedulePersistence};

pub async fn run(config: &Config, id: &str, enabled: bool) -> Result<()> {
    let persistence = SchedulePersistence::new(config.schedules_path());
    let mut overrides = persistence.load().await;

    match overrides.iter_mut().find(|o| o.id == id) {
        Some(existing) => existing.enabled = enabled,
        None => overrides.push(ScheduleOverride { id: id.to_string(), last_run: None, next_run: None, enabled }),
    }

    persistence.save(&overrides).await;

    let verb = if enabled { "enabled" } else { "disabled" };
    println!("{id} {verb} (takes effect on the next dcyfrd start)");
    Ok(())
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
