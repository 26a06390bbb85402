// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `HealthSnapshot` (spec §3, §4.7).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scanner::ScannerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Critical,
}

impl HealthStatus {
    /// `>=90 healthy, >=70 degraded, else critical` (spec §4.7).
    pub fn classify(score: f64) -> Self {
        if score >= 90.0 {
            HealthStatus::Healthy
        } else if score >= 70.0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Critical
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerHealth {
    pub score: Option<f64>,
    pub status: Option<HealthStatus>,
    pub last_run: DateTime<Utc>,
    pub violations_count: usize,
    pub warnings_count: usize,
    pub metrics: HashMap<String, f64>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceHealth {
    pub packages: usize,
    pub last_scan_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallHealth {
    pub score: f64,
    pub status: HealthStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub timestamp: DateTime<Utc>,
    pub overall: OverallHealth,
    pub scanners: HashMap<ScannerId, ScannerHealth>,
    pub workspace: WorkspaceHealth,
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
