// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! dcyfr-daemon: the process supervisor (C6, spec §4.6).
//!
//! Owns single-instance locking, signal-driven graceful drain, the
//! heartbeat loop, log rotation (§4.8), and the on-disk `daemon-state.json`
//! writer, wiring the queue (C3), scheduler (C4), watcher (C5) and health
//! aggregator (C7) together behind one [`supervisor::Supervisor`].
//!
//! `config` is public so `dcyfr` (the CLI crate) can resolve the same
//! `.dcyfr/` paths without a second source of truth — the CLI and the
//! daemon talk only through those files, never through an IPC channel
//! (spec.md §1 Non-goals).

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod defaults;
pub mod error;
pub mod log_rotation;
pub mod logging;
pub mod pidfile;
pub mod result_cache;
pub mod state_file;
pub mod supervisor;

pub use config::Config;
pub use error::LifecycleError;
pub use result_cache::ResultCache;
pub use state_file::DaemonStateSnapshot;
pub use supervisor::Supervisor;
