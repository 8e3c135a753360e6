// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Folder and task persistence ports.
//!
//! Writes are conditional: a backend applies a change only when the task is
//! still in one of the expected states and its folder is still active, and
//! reports what it found otherwise via [`WriteOutcome`]. This lets the state
//! machine resolve races (e.g. resolve vs. delete) deterministically without
//! a distributed lock.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::LeaddeskError;
use crate::types::{
    Appointment, CounterDelta, DailyFolder, DailyTaskItem, FolderStatus, TaskStatus,
};

/// Result of a conditional write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome<T> {
    /// The write was applied; carries the updated record.
    Applied(T),
    /// The target row does not exist (never did, or was deleted).
    Missing,
    /// The owning folder is no longer active.
    FolderInactive(FolderStatus),
    /// The task is in a state the change does not accept.
    StatusMismatch(TaskStatus),
    /// An optimistic precondition (e.g. expected priority) no longer holds.
    Stale,
}

/// How a change treats `completed_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    Keep,
    Set(DateTime<Utc>),
    Clear,
}

/// A status change plus the metadata written alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskChange {
    pub status: TaskStatus,
    /// Replaces `call_outcome` when `Some`.
    pub call_outcome: Option<String>,
    /// Replaces `notes` when `Some`.
    pub notes: Option<String>,
    pub completed_at: Stamp,
}

impl TaskChange {
    pub fn to(status: TaskStatus) -> Self {
        Self {
            status,
            call_outcome: None,
            notes: None,
            completed_at: Stamp::Keep,
        }
    }

    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.call_outcome = Some(outcome.into());
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn stamped(mut self, stamp: Stamp) -> Self {
        self.completed_at = stamp;
        self
    }

    /// Applies this change to an in-memory task record.
    pub fn apply(&self, task: &mut DailyTaskItem) {
        task.status = self.status;
        if let Some(outcome) = &self.call_outcome {
            task.call_outcome = Some(outcome.clone());
        }
        if let Some(notes) = &self.notes {
            task.notes = Some(notes.clone());
        }
        match self.completed_at {
            Stamp::Keep => {}
            Stamp::Set(at) => task.completed_at = Some(at),
            Stamp::Clear => task.completed_at = None,
        }
    }
}

/// The priority a caller observed for a task when planning a swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityClaim {
    pub task_id: String,
    pub priority: i64,
}

/// What a resolved call writes outside the task row.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub owner_id: String,
    /// Stored as the owner's last outcome.
    pub outcome: String,
    pub contacted_at: DateTime<Utc>,
    pub follow_up: Option<Appointment>,
}

/// Storage for [`DailyFolder`] aggregates.
#[async_trait]
pub trait FolderStore: Send + Sync {
    async fn folder_by_date(&self, date: NaiveDate) -> Result<Option<DailyFolder>, LeaddeskError>;

    async fn folder_by_id(&self, id: &str) -> Result<Option<DailyFolder>, LeaddeskError>;

    /// Persists a new folder and all of its items as one atomic unit.
    ///
    /// Fails with [`LeaddeskError::AlreadyGenerated`] when a folder for the
    /// same date already exists; in that case nothing is written.
    async fn insert_generation(
        &self,
        folder: &DailyFolder,
        tasks: &[DailyTaskItem],
    ) -> Result<(), LeaddeskError>;

    /// Marks an active folder completed and stamps `closed_at`.
    async fn close_folder(
        &self,
        id: &str,
        closed_at: DateTime<Utc>,
    ) -> Result<WriteOutcome<DailyFolder>, LeaddeskError>;

    /// Most recent folders, newest date first.
    async fn recent_folders(&self, limit: usize) -> Result<Vec<DailyFolder>, LeaddeskError>;
}

/// Storage for [`DailyTaskItem`]s.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn task(&self, id: &str) -> Result<Option<DailyTaskItem>, LeaddeskError>;

    /// All tasks of a folder, highest priority first.
    async fn tasks_for_folder(&self, folder_id: &str)
    -> Result<Vec<DailyTaskItem>, LeaddeskError>;

    async fn count_tasks(&self, folder_id: &str) -> Result<usize, LeaddeskError>;

    /// Applies `change` if the task's status is in `expected` and its folder is
    /// active, adding `counters` to the folder in the same atomic step.
    async fn apply_change(
        &self,
        id: &str,
        expected: &[TaskStatus],
        change: &TaskChange,
        counters: CounterDelta,
    ) -> Result<WriteOutcome<DailyTaskItem>, LeaddeskError>;

    /// Resolves a call as one atomic unit: the task change, the folder
    /// counters, the follow-up appointment, and the owner's last contact.
    ///
    /// On error nothing is written, so the resolve can be retried. A missing
    /// owner is not an error; only the owner update is skipped.
    async fn resolve_task(
        &self,
        id: &str,
        expected: &[TaskStatus],
        change: &TaskChange,
        counters: CounterDelta,
        record: &CallRecord,
    ) -> Result<WriteOutcome<DailyTaskItem>, LeaddeskError>;

    /// Replaces the notes of a task whose folder is active.
    async fn set_notes(
        &self,
        id: &str,
        notes: &str,
    ) -> Result<WriteOutcome<DailyTaskItem>, LeaddeskError>;

    /// Exchanges the priorities of two tasks if both still hold the claimed values.
    async fn swap_priorities(
        &self,
        first: &PriorityClaim,
        second: &PriorityClaim,
    ) -> Result<WriteOutcome<(DailyTaskItem, DailyTaskItem)>, LeaddeskError>;

    /// Hard-deletes a task whose folder is active.
    async fn delete_task(&self, id: &str) -> Result<WriteOutcome<()>, LeaddeskError>;
}
