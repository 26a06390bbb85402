// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue errors. Persistence failures are logged and swallowed at their call
//! site per spec §7 — this type exists for the few operations that can fail
//! synchronously in a way a caller must react to.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("io error persisting queue state: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize queue state: {0}")]
    Serde(#[from] serde_json::Error),
}
