// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Clock-driven triggers for the Leaddesk daily lifecycle.
//!
//! A single periodic timer drives two edge-triggered daily events:
//! folder generation (from 08:00) and folder closing (from 20:00). Each
//! fires at most once per calendar day; the last-fired dates are kept in a
//! durable local [`TriggerStateStore`](leaddesk_core::TriggerStateStore) so a
//! restart does not re-fire them.

pub mod runner;
pub mod shutdown;
pub mod state_file;
pub mod trigger;

pub use runner::run_triggers;
pub use state_file::JsonStateFile;
pub use trigger::{SkipReason, TriggerHours, TriggerOutcome, TriggerService};
