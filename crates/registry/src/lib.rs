// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dcyfr-registry: the scanner registry (C2, spec §4.1).
//!
//! Holds scanner definitions, dispatches by id, and enumerates by category
//! or project. `run`/`run_all` catch panicking scanners via `tokio::spawn`
//! (the only way to intercept a panic across an `.await` point) and convert
//! them into `error`-status results — a scanner panic never propagates to
//! the caller.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use dcyfr_core::{Category, GuardianError, ScanContext, ScanResult, Scanner, ScannerId, Status};
use parking_lot::RwLock;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

#[derive(Default, Clone)]
pub struct ScannerRegistry {
    scanners: Arc<RwLock<HashMap<ScannerId, Arc<dyn Scanner>>>>,
    // Preserves insertion order for `run_all` (spec §4.1: "insertion order").
    order: Arc<RwLock<Vec<ScannerId>>>,
}

impl ScannerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, scanner: Arc<dyn Scanner>) -> Result<(), GuardianError> {
        let id = scanner.id();
        let mut map = self.scanners.write();
        if map.contains_key(&id) {
            return Err(GuardianError::DuplicateId(id));
        }
        map.insert(id.clone(), scanner);
        self.order.write().push(id);
        Ok(())
    }

    pub fn get(&self, id: &ScannerId) -> Option<Arc<dyn Scanner>> {
        self.scanners.read().get(id).cloned()
    }

    pub fn list_ids(&self) -> Vec<ScannerId> {
        self.order.read().clone()
    }

    pub fn list_all(&self) -> Vec<Arc<dyn Scanner>> {
        let map = self.scanners.read();
        self.order.read().iter().filter_map(|id| map.get(id).cloned()).collect()
    }

    pub fn list_by_category(&self, category: Category) -> Vec<Arc<dyn Scanner>> {
        self.list_all().into_iter().filter(|s| s.category() == category).collect()
    }

    /// Scanners whose project set is absent or contains `project`.
    pub fn list_for_project(&self, project: Option<&str>) -> Vec<Arc<dyn Scanner>> {
        self.list_all().into_iter().filter(|s| s.applies_to(project)).collect()
    }

    fn known_ids_message(&self) -> String {
        self.list_ids().iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
    }

    /// Dispatch by id. Fails with `unknown-scanner` (spec §4.1, §7) if the id
    /// isn't registered.
    pub async fn run(&self, id: &ScannerId, ctx: &ScanContext) -> Result<ScanResult, GuardianError> {
        let scanner = self.get(id).ok_or_else(|| GuardianError::UnknownScanner {
            id: id.clone(),
            known: self.known_ids_message(),
        })?;
        Ok(run_isolated(scanner, ctx).await)
    }

    /// Run every scanner applicable to `ctx.project`, in insertion order.
    /// Panics are caught per-scanner and converted to `error`-status
    /// results — never propagated (spec §4.1).
    pub async fn run_all(&self, ctx: &ScanContext) -> Vec<ScanResult> {
        let scanners = self.list_for_project(ctx.project.as_deref());
        let mut results = Vec::with_capacity(scanners.len());
        for scanner in scanners {
            results.push(run_isolated(scanner, ctx).await);
        }
        results
    }
}

/// Run a single scanner, converting a panic into an `error` `ScanResult`.
async fn run_isolated(scanner: Arc<dyn Scanner>, ctx: &ScanContext) -> ScanResult {
    let id = scanner.id();
    let ctx = ctx.clone();
    let handle = tokio::spawn(async move { scanner.scan(&ctx).await });
    match handle.await {
        Ok(result) => result,
        Err(join_err) => {
            let message = if join_err.is_panic() {
                "scanner panicked".to_string()
            } else {
                "scanner task was cancelled".to_string()
            };
            tracing::warn!(scanner = %id, error = %message, "scanner execution error");
            ScanResult::execution_error(id, message, Utc::now())
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
