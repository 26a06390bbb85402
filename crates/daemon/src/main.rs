// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! dcyfrd — the guardian daemon binary.
//!
//! Wires up the supervisor (C6) against the current directory as the
//! workspace root, installs signal handlers, and blocks until a
//! termination signal initiates the graceful drain (spec §4.6, §5).
//! Concrete scanner implementations are out of scope for this crate (spec
//! §1 "Individual scanner rule logic ... opaque implementations of §4.1's
//! contract") — integrators register real scanners on the
//! [`dcyfr_registry::ScannerRegistry`] before calling [`Supervisor::start`];
//! this binary starts with an empty registry so the daemon's concurrency
//! substrate is exercisable standalone.

use std::process::ExitCode;

use dcyfr_daemon::{Config, LifecycleError, Supervisor};
use dcyfr_health::HealthConfig;
use dcyfr_registry::ScannerRegistry;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let workspace_root =
        std::env::args().nth(1).map(std::path::PathBuf::from).unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."))
        });

    let cfg = Config::load(&workspace_root);
    let registry = ScannerRegistry::new();

    let supervisor = match Supervisor::start(cfg, registry, HealthConfig::default()).await {
        Ok(s) => s,
        Err(LifecycleError::AlreadyRunning { pid }) => {
            eprintln!("dcyfrd is already running (pid {pid})");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!("dcyfrd failed to start: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(err) => {
            error!(error = %err, "failed to install SIGTERM handler");
            return ExitCode::FAILURE;
        }
    };
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(err) => {
            error!(error = %err, "failed to install SIGINT handler");
            return ExitCode::FAILURE;
        }
    };
    let mut sighup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(err) => {
            error!(error = %err, "failed to install SIGHUP handler");
            return ExitCode::FAILURE;
        }
    };

    println!("READY");
    info!("dcyfrd ready");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM"),
        _ = sigint.recv() => info!("received SIGINT"),
        _ = sighup.recv() => info!("received SIGHUP, treating as graceful stop (reload is not supported)"),
    }

    supervisor.shutdown().await;
    ExitCode::SUCCESS
}
