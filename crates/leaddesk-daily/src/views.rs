// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-side projections over a folder's task list.
//!
//! Presentation only: sorting by name or type never affects the persisted
//! priority order that `reorder` works on.

use std::cmp::Reverse;

use leaddesk_core::DailyTaskItem;
use serde::Serialize;
use strum::{Display, EnumString};

/// Which tasks a view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ViewFilter {
    /// Pending and in-progress tasks.
    #[default]
    Active,
    /// Archived, completed, and skipped tasks.
    Archived,
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SortOrder {
    #[default]
    Priority,
    Name,
    Type,
}

/// A task joined with its owner's display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRow {
    #[serde(flatten)]
    pub task: DailyTaskItem,
    pub owner_name: String,
}

impl ViewFilter {
    pub fn admits(self, task: &DailyTaskItem) -> bool {
        match self {
            ViewFilter::Active => task.status.is_active(),
            ViewFilter::Archived => task.status.is_terminal(),
            ViewFilter::All => true,
        }
    }
}

/// Filters and sorts `rows`. Ties always fall back to priority, highest first.
pub fn project(rows: Vec<TaskRow>, filter: ViewFilter, sort: SortOrder) -> Vec<TaskRow> {
    let mut rows: Vec<TaskRow> = rows.into_iter().filter(|r| filter.admits(&r.task)).collect();
    match sort {
        SortOrder::Priority => rows.sort_by_key(|r| Reverse(r.task.priority)),
        SortOrder::Name => {
            rows.sort_by_key(|r| (r.owner_name.to_lowercase(), Reverse(r.task.priority)))
        }
        SortOrder::Type => {
            rows.sort_by_key(|r| (Reverse(r.task.task_type.rank()), Reverse(r.task.priority)))
        }
    }
    rows
}
