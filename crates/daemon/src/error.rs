// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor-level errors (spec §7 "Fatal": only startup conditions are
//! unrecoverable — cannot create the state dir, cannot bind signal
//! handlers, another instance is already running).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("another instance is already running (pid {pid})")]
    AlreadyRunning { pid: u32 },

    #[error("could not create state directory {path}: {source}")]
    StateDir { path: String, source: std::io::Error },

    #[error("failed to install signal handlers: {0}")]
    Signal(#[source] std::io::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
