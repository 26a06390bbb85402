// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in watcher rules (spec §3, §4.5), mirroring
//! `dcyfr_scheduler::defaults` — generic but realistic for the cadences a
//! guardian daemon actually reacts to, matching the scanner ids in the
//! scheduler's own defaults list so a single run of either trigger source
//! covers the same scanners.

use dcyfr_core::{ScannerId, WatcherRule};

/// The system's built-in watcher rules. Pattern compilation is infallible
/// for these literals; a build-time constant failing to compile would be a
/// programming error, not a runtime one.
pub fn default_rules() -> Vec<WatcherRule> {
    let mut rules = Vec::new();
    if let Ok(rule) = WatcherRule::new(
        r".*\.(rs|toml)$",
        [ScannerId::from("license-headers")],
        None,
    ) {
        rules.push(rule);
    }
    if let Ok(rule) =
        WatcherRule::new(r"(^|/)Cargo\.(toml|lock)$", [ScannerId::from("dependency-audit")], None)
    {
        rules.push(rule);
    }
    if let Ok(rule) = WatcherRule::new(
        r".*\.rs$",
        [ScannerId::from("workspace-health")],
        Some(2_000),
    ) {
        rules.push(rule);
    }
    rules
}
