// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ScanResult` (spec §3).
//!
//! Invariants (checked in debug builds by [`ScanResult::validate`], not
//! enforced at construction — scanners are external and the core must not
//! panic on a malformed result, only report it):
//! every `violations` entry has severity `error`; every `warnings` entry has
//! severity `warning`/`info`; `pass` implies both lists are empty; `error`
//! status is reserved for execution failures, not findings.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scanner::ScannerId;
use crate::violation::{Severity, Violation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Warn,
    Fail,
    Error,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub scanner: ScannerId,
    pub status: Status,
    pub violations: Vec<Violation>,
    pub warnings: Vec<Violation>,
    pub metrics: HashMap<String, f64>,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
    pub summary: String,
}

impl ScanResult {
    /// Build a result for a scanner that threw/panicked (spec §4.1, §4.3).
    pub fn execution_error(scanner: ScannerId, message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            scanner,
            status: Status::Error,
            violations: vec![],
            warnings: vec![],
            metrics: HashMap::new(),
            duration_ms: 0,
            timestamp: now,
            summary: message.into(),
        }
    }

    /// True if the result respects the invariants in spec §3. Violated
    /// invariants are a scanner bug, not a core failure, so callers log
    /// rather than reject the result.
    pub fn is_well_formed(&self) -> bool {
        let violations_all_error = self.violations.iter().all(|v| v.severity == Severity::Error);
        let warnings_not_error = self.warnings.iter().all(|v| v.severity != Severity::Error);
        let pass_implies_empty = self.status != Status::Pass || self.violations.is_empty();
        violations_all_error && warnings_not_error && pass_implies_empty
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
