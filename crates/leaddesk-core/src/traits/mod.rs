// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port traits at the boundary between the lifecycle core and its collaborators.
//!
//! Every data-store port uses `#[async_trait]` so implementations can be held
//! as `Arc<dyn Trait>` and swapped between SQLite and in-memory backends.

pub mod calendar;
pub mod clock;
pub mod directory;
pub mod notify;
pub mod storage;
pub mod trigger_state;

pub use calendar::AppointmentBook;
pub use clock::{Clock, SystemClock};
pub use directory::OwnerDirectory;
pub use notify::{Notifier, TracingNotifier};
pub use storage::{
    CallRecord, FolderStore, PriorityClaim, Stamp, TaskChange, TaskStore, WriteOutcome,
};
pub use trigger_state::TriggerStateStore;
