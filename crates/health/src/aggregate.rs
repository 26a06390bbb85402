// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pure aggregation transform (spec §4.7): `ScanResult`s in, a
//! `HealthSnapshot` out. No I/O, no clock dependency beyond the caller
//! supplying `now` — this makes `build` trivial to property-test (spec P7).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dcyfr_core::{HealthSnapshot, HealthStatus, OverallHealth, ScanResult, ScannerHealth, ScannerId, Status, WorkspaceHealth};

/// Per-scanner component score (spec §4.7):
/// `metrics.compliance` wins if present, else `metrics.usage`, else a
/// status-mapped fallback. `Skipped` has no score and is excluded from the
/// weighted mean entirely.
pub fn component_score(result: &ScanResult) -> Option<f64> {
    if let Some(&compliance) = result.metrics.get("compliance") {
        return Some(compliance);
    }
    if let Some(&usage) = result.metrics.get("usage") {
        return Some(usage);
    }
    match result.status {
        Status::Pass => Some(100.0),
        Status::Warn => Some(70.0),
        Status::Fail => Some(30.0),
        Status::Error => Some(0.0),
        Status::Skipped => None,
    }
}

fn weight_for(weights: &HashMap<ScannerId, u32>, scanner: &ScannerId) -> u32 {
    weights.get(scanner).copied().unwrap_or(1)
}

/// Builds a complete snapshot from the latest result per scanner. Callers
/// (the daemon's result cache) are responsible for passing one `ScanResult`
/// per scanner id; duplicates overwrite in iteration order.
pub fn build(
    results: &[ScanResult],
    weights: &HashMap<ScannerId, u32>,
    workspace: WorkspaceHealth,
    now: DateTime<Utc>,
) -> HealthSnapshot {
    let mut scanners = HashMap::with_capacity(results.len());
    let mut weighted_sum = 0.0;
    let mut weight_total = 0u32;

    for result in results {
        let score = component_score(result);
        let status = score.map(HealthStatus::classify);
        if let Some(score) = score {
            let weight = weight_for(weights, &result.scanner);
            weighted_sum += score * weight as f64;
            weight_total += weight;
        }
        scanners.insert(
            result.scanner.clone(),
            ScannerHealth {
                score,
                status,
                last_run: result.timestamp,
                violations_count: result.violations.len(),
                warnings_count: result.warnings.len(),
                metrics: result.metrics.clone(),
                summary: result.summary.clone(),
            },
        );
    }

    let overall_score = if weight_total == 0 { 100.0 } else { weighted_sum / weight_total as f64 };
    let overall_score = (overall_score * 10.0).round() / 10.0;

    HealthSnapshot {
        timestamp: now,
        overall: OverallHealth { score: overall_score, status: HealthStatus::classify(overall_score) },
        scanners,
        workspace,
    }
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
