// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scanner contract (spec §3, §4.1).
//!
//! A scanner is the only extension point the core depends on. Its rule
//! logic (design-token regexes, license-header patterns, AI prompts, ...) is
//! deliberately out of scope here: the core only needs `scan`/`fix` to be
//! reentrant, non-throwing at the business level, and to produce a
//! `ScanResult`.

use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::ScanContext;
use crate::result::ScanResult;
use crate::violation::Violation;

/// Short, stable identifier for a scanner, e.g. `"license-headers"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScannerId(String);

impl ScannerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScannerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ScannerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ScannerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A scanner's rule category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Compliance,
    Security,
    Documentation,
    Cleanup,
    Testing,
    Governance,
}

/// Outcome of an optional `fix` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixResult {
    pub fixed: Vec<String>,
    pub failed: Vec<String>,
}

/// The uniform contract every analyzer implements (spec §3, §4.1).
///
/// `scan` may suspend on I/O and must be reentrant: two invocations with
/// different contexts may run concurrently whenever the queue allows it.
/// It must never panic on a business-level finding — those go into the
/// returned `ScanResult`. Unexpected panics/errors are caught by the queue
/// (§4.3) and the registry's `run_all` (§4.1) and turned into an
/// `error`-status result.
#[async_trait]
pub trait Scanner: Send + Sync {
    fn id(&self) -> ScannerId;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn category(&self) -> Category;

    /// `None` means "applies to all projects".
    fn projects(&self) -> Option<&[String]> {
        None
    }

    fn applies_to(&self, project: Option<&str>) -> bool {
        match (self.projects(), project) {
            (None, _) => true,
            (Some(_), None) => true,
            (Some(list), Some(p)) => list.iter().any(|x| x == p),
        }
    }

    async fn scan(&self, ctx: &ScanContext) -> ScanResult;

    /// Only invoked on violations the scanner itself marked `autoFixable`.
    async fn fix(&self, _ctx: &ScanContext, _violations: &[Violation]) -> Option<FixResult> {
        None
    }
}

/// Scanner ids as a sorted set, used for the watcher's batch-key computation
/// (spec §4.5) where a stable, deterministic ordering matters.
pub fn sorted_ids<'a>(ids: impl IntoIterator<Item = &'a ScannerId>) -> BTreeSet<ScannerId> {
    ids.into_iter().cloned().collect()
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
