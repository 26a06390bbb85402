// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in schedule defaults (spec §4.4: "a built-in defaults list, ids and
//! intervals defined by the system"). Intervals are intentionally generic —
//! scanner rule logic is out of scope here (spec.md Non-goals) — but chosen
//! to span the cadences a guardian daemon realistically runs at.

use dcyfr_core::{ScannerId, ScheduleEntry};

const HOUR_MS: u64 = 60 * 60 * 1000;

/// The system's built-in `ScheduleEntry` set. Merged with persisted
/// overrides by [`crate::merge_with_overrides`] on every startup.
pub fn default_entries() -> Vec<ScheduleEntry> {
    vec![
        ScheduleEntry::new(
            "license-headers",
            "License header audit",
            ScannerId::from("license-headers"),
            HOUR_MS,
        ),
        ScheduleEntry::new(
            "dependency-audit",
            "Dependency freshness audit",
            ScannerId::from("dependency-audit"),
            24 * HOUR_MS,
        ),
        ScheduleEntry::new(
            "workspace-health",
            "Workspace health rollup",
            ScannerId::from("workspace-health"),
            6 * HOUR_MS,
        ),
    ]
}
