// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crate-wide error taxonomy (spec §7).
//!
//! Scanner execution errors and business failures never reach this type —
//! they're captured inside `ScanResult`. `GuardianError` covers the failures
//! that are synchronous and surfaced to a caller: unknown scanner ids,
//! duplicate registrations, and single-instance collisions. Persistence and
//! watcher-host failures are logged and swallowed at their call sites per
//! spec §7, so they don't need a variant here.

use thiserror::Error;

use crate::scanner::ScannerId;

#[derive(Debug, Error)]
pub enum GuardianError {
    #[error("unknown scanner '{id}' (known scanners: {known})")]
    UnknownScanner { id: ScannerId, known: String },

    #[error("scanner '{0}' is already registered")]
    DuplicateId(ScannerId),

    #[error("another instance is already running (pid {pid})")]
    AlreadyRunning { pid: u32 },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
