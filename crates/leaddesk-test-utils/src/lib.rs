// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Leaddesk integration tests.
//!
//! Provides in-memory ports and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without a wall clock or a real backend.
//!
//! # Components
//!
//! - [`MemoryStore`] - In-memory folder, task, owner, and appointment store
//! - [`FixedClock`] - Settable clock for driving trigger hours and dates
//! - [`RecordingNotifier`] - Notifier that captures every event
//! - [`MemoryStateStore`] - In-memory trigger state with optional save failures
//! - [`TestHarness`] - Fully wired lifecycle, state machine, and triggers

pub mod clock;
pub mod fixtures;
pub mod harness;
pub mod memory_store;
pub mod notifier;
pub mod state_store;

pub use clock::FixedClock;
pub use harness::{Backend, TestHarness, TestHarnessBuilder};
pub use memory_store::MemoryStore;
pub use notifier::RecordingNotifier;
pub use state_store::MemoryStateStore;
