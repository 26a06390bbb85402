// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("unknown schedule entry: {0}")]
    UnknownEntry(String),
    #[error("io error persisting schedule state: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize schedule state: {0}")]
    Serde(#[from] serde_json::Error),
}
