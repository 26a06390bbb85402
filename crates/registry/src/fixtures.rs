// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic fixture scanners used by this crate's own tests and
//! re-exported (behind `test-support`) for `dcyfr-queue`, `dcyfr-scheduler`,
//! and `dcyfr-daemon` to exercise the queue/registry seam without pulling in
//! real scanner rule logic, mirroring the teacher's `oj-adapters`
//! `test-support` `FakeAdapter` pattern.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dcyfr_core::{Category, ScanContext, ScanResult, Scanner, ScannerId, Status, Violation};

pub struct FixedScanner {
    pub id: ScannerId,
    pub status: Status,
    pub projects: Option<Vec<String>>,
}

impl FixedScanner {
    pub fn passing(id: &str) -> Self {
        Self { id: ScannerId::from(id), status: Status::Pass, projects: None }
    }

    pub fn failing(id: &str) -> Self {
        Self { id: ScannerId::from(id), status: Status::Fail, projects: None }
    }

    pub fn scoped_to(id: &str, projects: Vec<String>) -> Self {
        Self { id: ScannerId::from(id), status: Status::Pass, projects: Some(projects) }
    }
}

#[async_trait]
impl Scanner for FixedScanner {
    fn id(&self) -> ScannerId {
        self.id.clone()
    }
    fn name(&self) -> &str {
        "Fixed Test Scanner"
    }
    fn description(&self) -> &str {
        "deterministic fixture scanner"
    }
    fn category(&self) -> Category {
        Category::Testing
    }
    fn projects(&self) -> Option<&[String]> {
        self.projects.as_deref()
    }
    async fn scan(&self, _ctx: &ScanContext) -> ScanResult {
        let violations = if self.status == Status::Fail {
            vec![Violation::error("fixture", "fixture scanner configured to fail")]
        } else {
            vec![]
        };
        ScanResult {
            scanner: self.id.clone(),
            status: self.status,
            violations,
            warnings: vec![],
            metrics: HashMap::new(),
            duration_ms: 0,
            timestamp: Utc::now(),
            summary: "fixture result".to_string(),
        }
    }
}

/// Sleeps before returning, so callers can exercise concurrency limits and
/// graceful-drain timing (spec §8 S4) without a real scanner.
pub struct SlowScanner {
    pub id: ScannerId,
    pub delay: Duration,
}

#[async_trait]
impl Scanner for SlowScanner {
    fn id(&self) -> ScannerId {
        self.id.clone()
    }
    fn name(&self) -> &str {
        "Slow Test Scanner"
    }
    fn description(&self) -> &str {
        "sleeps before returning, for drain/concurrency tests"
    }
    fn category(&self) -> Category {
        Category::Testing
    }
    async fn scan(&self, _ctx: &ScanContext) -> ScanResult {
        tokio::time::sleep(self.delay).await;
        ScanResult {
            scanner: self.id.clone(),
            status: Status::Pass,
            violations: vec![],
            warnings: vec![],
            metrics: HashMap::new(),
            duration_ms: self.delay.as_millis() as u64,
            timestamp: Utc::now(),
            summary: "slow fixture completed".to_string(),
        }
    }
}

/// Panics unconditionally; used to verify the registry and queue convert a
/// scanner panic into an `error`-status result rather than crashing (spec
/// §4.1, §4.3, §7).
pub struct PanickingScanner {
    pub id: ScannerId,
}

#[async_trait]
impl Scanner for PanickingScanner {
    fn id(&self) -> ScannerId {
        self.id.clone()
    }
    fn name(&self) -> &str {
        "Panicking Test Scanner"
    }
    fn description(&self) -> &str {
        "always panics, for failure-isolation tests"
    }
    fn category(&self) -> Category {
        Category::Testing
    }
    #[allow(clippy::panic)]
    async fn scan(&self, _ctx: &ScanContext) -> ScanResult {
        panic!("fixture scanner panicking on purpose")
    }
}
