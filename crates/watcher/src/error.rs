// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watcher errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("failed to start filesystem watcher: {0}")]
    Notify(#[from] notify::Error),
}
