// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dcyfr-core: shared data model for the dcyfr workspace guardian.
//!
//! This crate defines the contract every component of the guardian daemon
//! speaks: the scanner trait, scan inputs/outputs, the task/queue records,
//! schedule and watcher rule records, the health snapshot, and the
//! in-process event bus. It has no knowledge of how tasks are scheduled,
//! persisted, or executed — that belongs to `dcyfr-queue`, `dcyfr-scheduler`,
//! and `dcyfr-daemon`.

pub mod clock;
pub mod context;
pub mod error;
pub mod event;
pub mod health;
pub mod result;
pub mod scanner;
pub mod schedule;
pub mod task;
pub mod violation;
pub mod watcher_rule;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
pub use context::ScanContext;
pub use error::GuardianError;
pub use event::{Event, EventBus, EventKind, Unsubscribe};
pub use health::{HealthSnapshot, HealthStatus, OverallHealth, ScannerHealth, WorkspaceHealth};
pub use result::{ScanResult, Status};
pub use scanner::{sorted_ids, Category, FixResult, Scanner, ScannerId};
pub use schedule::ScheduleEntry;
pub use task::{Priority, Task, TaskId, TaskSource, TaskStatus};
pub use violation::{Severity, Violation};
pub use watcher_rule::{RulePatternError, WatcherRule};
