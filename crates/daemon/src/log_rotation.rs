// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log rotation (spec §4.8).
//!
//! Checked on every heartbeat rather than delegated to `tracing-appender`'s
//! own rolling file, because the spec's numbered-chain semantics (`<log>.N`,
//! oldest deleted, everything else shifted up by one) are more specific
//! than what that crate provides out of the box. `tracing-appender` is kept
//! for the non-blocking writer plumbing (see `logging.rs`); rotation here
//! is a plain size check + rename chain against the same path, grounded on
//! the teacher's `rotate_log_if_needed` in `daemon/src/main.rs`.

use std::path::Path;

use tracing::warn;

/// If `log_path`'s size is >= `max_bytes`, perform the rotation chain:
/// delete `<log>.N`, shift `.i -> .i+1` for `i = N-1..1` (skipping missing
/// ones), rename `<log> -> <log>.1`, then let the next write recreate
/// `<log>` fresh. All failures are non-fatal (spec §4.8 "All failures are
/// non-fatal").
pub fn rotate_if_needed(log_path: &Path, max_bytes: u64, max_generations: u32) {
    let size = match std::fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(_) => return,
    };
    if size < max_bytes {
        return;
    }
    if let Err(err) = rotate(log_path, max_generations) {
        warn!(error = %err, path = %log_path.display(), "log rotation failed");
    }
}

fn rotate(log_path: &Path, max_generations: u32) -> std::io::Result<()> {
    let base = log_path.display().to_string();

    let oldest = format!("{base}.{max_generations}");
    if Path::new(&oldest).exists() {
        std::fs::remove_file(&oldest)?;
    }

    for i in (1..max_generations).rev() {
        let from = format!("{base}.{i}");
        if !Path::new(&from).exists() {
            continue;
        }
        let to = format!("{base}.{}", i + 1);
        std::fs::rename(&from, &to)?;
    }

    std::fs::rename(log_path, format!("{base}.1"))?;
    // Reopen-per-write means the logger doesn't hold a stale file handle
    // across the rename (see `logging.rs`), but create the fresh file here
    // too so a reader checking immediately after rotation sees it exist.
    std::fs::OpenOptions::new().create(true).write(true).open(log_path)?;
    Ok(())
}

#[cfg(test)]
#[path = "log_rotation_tests.rs"]
mod tests;
