// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `dcyfr` — the thin CLI for dcyfr-guardian (SPEC_FULL.md A.1).
//!
//! Talks to a running `dcyfrd` only through the files under `.dcyfr/`; no
//! IPC protocol is defined. Output is plain text.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod daemon_handle;
mod exit_error;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dcyfr_daemon::Config;
use exit_error::ExitError;

#[derive(Parser)]
#[command(name = "dcyfr", about = "Workspace guardian daemon control")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start dcyfrd for the current workspace
    Start,
    /// Stop a running dcyfrd
    Stop,
    /// Show daemon and health status
    Status,
    /// Run one scanner synchronously and print its result
    Scan {
        /// Scanner id, e.g. "license-headers"
        id: String,
    },
    /// Enable or disable a scheduled scan
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },
}

#[derive(Subcommand)]
enum ScheduleAction {
    Enable { id: String },
    Disable { id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let workspace_root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("could not determine current directory: {err}");
            return ExitCode::FAILURE;
        }
    };
    let config = Config::load(&workspace_root);

    let result = match cli.command {
        Command::Start => commands::start::run(&config),
        Command::Stop => commands::stop::run(&config).await,
        Command::Status => commands::status::run(&config),
        Command::Scan { id } => commands::scan::run(&config.workspace_root, &id).await,
        Command::Schedule { action } => match action {
            ScheduleAction::Enable { id } => commands::schedule::run(&config, &id, true).await,
            ScheduleAction::Disable { id } => commands::schedule::run(&config, &id, false).await,
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(exit_err) = err.downcast_ref::<ExitError>() {
                eprintln!("{exit_err}");
                return exit_code_from(exit_err.code);
            }
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn exit_code_from(code: i32) -> ExitCode {
    u8::try_from(code).map(ExitCode::from).unwrap_or(ExitCode::FAILURE)
}
