// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance enforcement via PID file (spec §4.6, §7).
//!
//! Grounded on the teacher's `lifecycle/startup.rs`: an exclusive
//! `fs2::try_lock_exclusive` on the PID file is what actually decides
//! liveness — a stale PID from a crashed process never holds the lock, so
//! there is no PID-reuse race window the way a `kill(pid, 0)` probe would
//! have. The file's *contents* exist only so the error message and `status`
//! queries can report the other instance's pid (spec §7 "include the pid in
//! the message").

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::LifecycleError;

/// Holds the exclusive lock for the lifetime of the daemon process.
/// Dropping it releases the lock; callers should hold it in daemon state
/// for as long as the process runs and call [`PidLock::remove`] on the
/// graceful-stop path so the file disappears instead of merely unlocking.
pub struct PidLock {
    file: File,
    path: std::path::PathBuf,
}

/// Acquire the single-instance lock (spec §4.6 "Single-instance
/// invariant"). Ensures the state directory exists, then tries to lock the
/// PID file exclusively; on success, writes the current pid. On failure,
/// reads whatever pid the live holder last wrote and surfaces
/// `already-running`.
pub fn acquire(state_dir: &Path, pid_path: &Path) -> Result<PidLock, LifecycleError> {
    std::fs::create_dir_all(state_dir)
        .map_err(|source| LifecycleError::StateDir { path: state_dir.display().to_string(), source })?;

    let file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(pid_path)?;

    if let Err(_lock_err) = fs2::FileExt::try_lock_exclusive(&file) {
        let pid = std::fs::read_to_string(pid_path)
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(0);
        return Err(LifecycleError::AlreadyRunning { pid });
    }

    // We hold the lock: any prior contents belonged to a process that is no
    // longer running (stale) — overwrite with our own pid (spec §4.6 steps
    // 3-4).
    let mut file = file;
    file.set_len(0)?;
    use std::io::Seek;
    file.seek(std::io::SeekFrom::Start(0))?;
    writeln!(file, "{}", std::process::id())?;
    file.flush()?;

    Ok(PidLock { file, path: pid_path.to_path_buf() })
}

impl PidLock {
    /// Remove the PID file (spec §4.6 stop sequence step 6). The exclusive
    /// lock is released implicitly on drop regardless.
    pub fn remove(&self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

impl Drop for PidLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
#[path = "pidfile_tests.rs"]
mod tests;
