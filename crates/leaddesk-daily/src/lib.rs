// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily task lifecycle for Leaddesk.
//!
//! This crate provides:
//! - **Task generator**: builds a day's prioritized worklist from the owner roster
//! - **Folder lifecycle**: generation, closing, summaries, and history
//! - **Task state machine**: start, resolve, archive, restore, reorder, notes, delete
//! - **Views**: read-side filter and sort projections

pub mod generator;
pub mod lifecycle;
pub mod machine;
pub mod ports;
pub mod priority;
pub mod views;

pub use generator::{Generated, TaskGenerator};
pub use lifecycle::{DailyFolderLifecycle, DailySummary, FolderView};
pub use machine::{Resolution, TaskStateMachine};
pub use ports::Ports;
pub use views::{SortOrder, TaskRow, ViewFilter, project};
