// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logging setup (SPEC_FULL.md A.2), grounded on
//! `groblegark-oddjobs`'s `crates/daemon/src/main.rs::setup_logging`
//! (`tracing_subscriber` registry + `EnvFilter` + `tracing_appender`
//! non-blocking file writer) — a sibling fork of this repo's teacher that
//! retains the daemon `main.rs` this repo's own teacher checkout dropped.
//!
//! The writer reopens the log file in append mode on every flush rather
//! than holding one `File` handle for the process lifetime. That's the
//! detail that makes `log_rotation::rotate_if_needed`'s rename-chain
//! visible to the very next log line instead of only after a restart — a
//! held handle would keep appending to the renamed `.1` generation.
//!
//! The file layer uses a custom [`DcyfrLogFormat`] so `daemon.log` matches
//! the literal on-disk record shape spec.md §6 documents
//! (`[ISO-8601] LEVEL <message>`) rather than `tracing_subscriber`'s default
//! layout; the stderr layer keeps the crate's default formatting since
//! spec.md makes no claim about terminal output.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt as fmt_layer, prelude::*, EnvFilter};

#[derive(Clone)]
struct ReopeningWriter {
    path: Arc<PathBuf>,
}

impl io::Write for ReopeningWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        use std::io::Write as _;
        let mut file = std::fs::OpenOptions::new().create(true).append(true).open(&*self.path)?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Renders one `daemon.log` record as `[ISO-8601] LEVEL <message>` (spec.md
/// §6), with any structured fields appended after the message the way
/// `tracing_subscriber`'s own default formatter does.
struct DcyfrLogFormat;

impl<S, N> FormatEvent<S, N> for DcyfrLogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        write!(writer, "[{timestamp}] {} ", event.metadata().level())?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Installs a global `tracing` subscriber writing to `log_path` (appended,
/// non-blocking, `[ISO-8601] LEVEL <message>` records) plus stderr during
/// development. Returns the worker guard — the caller must keep it alive
/// for the process lifetime or buffered log lines are dropped on exit.
pub fn init(log_path: &std::path::Path) -> io::Result<tracing_appender::non_blocking::WorkerGuard> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let writer = ReopeningWriter { path: Arc::new(log_path.to_path_buf()) };
    let (non_blocking, guard) = tracing_appender::non_blocking(writer);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer::layer().with_writer(non_blocking).with_ansi(false).event_format(DcyfrLogFormat))
        .with(fmt_layer::layer().with_writer(io::stderr))
        .init();

    Ok(guard)
}
