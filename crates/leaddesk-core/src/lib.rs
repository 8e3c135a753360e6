// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Leaddesk daily task lifecycle.
//!
//! This crate provides the domain types, the error taxonomy, and the port
//! traits shared across the Leaddesk workspace. Storage backends, the
//! scheduler, and the CLI all program against the ports defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::LeaddeskError;
pub use types::{
    Appointment, AppointmentType, CounterDelta, DailyFolder, DailyTaskItem, FolderCounters,
    FolderStatus, NotificationEvent, Owner, SchedulerState, TaskChangeKind, TaskStatus, TaskType,
    Temperature,
};

pub use traits::{
    AppointmentBook, CallRecord, Clock, FolderStore, Notifier, OwnerDirectory, PriorityClaim,
    Stamp, SystemClock, TaskChange, TaskStore, TracingNotifier, TriggerStateStore, WriteOutcome,
};
