// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ScheduleEntry` (spec §3, §4.4).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scanner::ScannerId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: String,
    pub name: String,
    pub scanner: ScannerId,
    pub interval_ms: u64,
    pub enabled: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub options: HashMap<String, Value>,
}

impl ScheduleEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, scanner: ScannerId, interval_ms: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scanner,
            interval_ms,
            enabled: true,
            last_run: None,
            next_run: None,
            options: HashMap::new(),
        }
    }

    /// An entry is overdue at `now` if it has never run, or its last run is
    /// older than its interval (spec §4.4 catch-up rule).
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.last_run {
            None => true,
            Some(last) => {
                let elapsed = now.signed_duration_since(last).num_milliseconds().max(0) as u64;
                elapsed > self.interval_ms
            }
        }
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
