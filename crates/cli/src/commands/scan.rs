// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dcyfr scan <id>` — run one scanner synchronously against the current
//! workspace and print its result.
//!
//! This does not talk to a running `dcyfrd`: there is no IPC channel to
//! hand it a one-off request (SPEC_FULL.md A.1), so the CLI drives the
//! same `dcyfr_registry::ScannerRegistry::run` path the daemon's queue uses,
//! in its own short-lived process. Concrete scanner implementations are out
//! of scope for this workspace (spec.md §1) — the registry built here is
//! empty, so every invocation reports `unknown-scanner` until real scanners
//! are registered by an integrator, exactly like `dcyfrd`'s own `main.rs`.

use anyhow::Result;
use dcyfr_core::{GuardianError, ScanContext, ScannerId, Status};
use dcyfr_registry::ScannerRegistry;

use crate::exit_error::ExitError;

pub async fn run(workspace_root: &std::path::Path, scanner_id: &str) -> Result<()> {
    let registry = ScannerRegistry::new();
    let ctx = ScanContext::new(workspace_root);

    let result = registry
        .run(&ScannerId::from(scanner_id), &ctx)
        .await
        .map_err(|err| match err {
            GuardianError::UnknownScanner { id, known } => {
                let known = if known.is_empty() { "(none registered)".to_string() } else { known };
                ExitError::new(2, format!("unknown scanner {id}; known scanners: {known}"))
            }
            other => ExitError::new(1, other.to_string()),
        })?;

    println!("{}: {:?}", result.scanner, result.status);
    println!("{}", result.summary);
    for violation in &result.violations {
        println!("  error: {}", violation.message);
    }
    for warning in &result.warnings {
        println!("  warn: {}", warning.message);
    }

    if matches!(result.status, Status::Fail | Status::Error) {
        return Err(ExitError::new(1, "scan reported a failure").into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
