// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily folder lifecycle: generation, closing, and read access.

use std::collections::HashMap;

use chrono::NaiveDate;
use leaddesk_core::{
    DailyFolder, DailyTaskItem, FolderStatus, LeaddeskError, NotificationEvent, TaskStatus,
    TaskType, WriteOutcome,
};
use serde::Serialize;
use tracing::info;

use crate::generator::{Generated, TaskGenerator};
use crate::ports::Ports;
use crate::views::TaskRow;

/// A folder with its tasks, highest priority first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderView {
    pub folder: DailyFolder,
    pub tasks: Vec<DailyTaskItem>,
}

/// Task counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub skipped: usize,
    pub archived: usize,
}

/// Task counts by reason for inclusion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeBreakdown {
    pub new_contact: usize,
    pub follow_up: usize,
    pub callback: usize,
}

/// Performance record of one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub folder: DailyFolder,
    pub by_status: StatusBreakdown,
    pub by_type: TypeBreakdown,
    /// `successful_calls / completed_calls`, or 0 when no call was completed.
    pub success_rate: f64,
}

impl DailySummary {
    fn build(folder: DailyFolder, tasks: &[DailyTaskItem]) -> Self {
        let mut by_status = StatusBreakdown::default();
        let mut by_type = TypeBreakdown::default();
        for task in tasks {
            match task.status {
                TaskStatus::Pending => by_status.pending += 1,
                TaskStatus::InProgress => by_status.in_progress += 1,
                TaskStatus::Completed => by_status.completed += 1,
                TaskStatus::Skipped => by_status.skipped += 1,
                TaskStatus::Archived => by_status.archived += 1,
            }
            match task.task_type {
                TaskType::NewContact => by_type.new_contact += 1,
                TaskType::FollowUp => by_type.follow_up += 1,
                TaskType::Callback => by_type.callback += 1,
            }
        }
        let success_rate = if folder.completed_calls == 0 {
            0.0
        } else {
            f64::from(folder.successful_calls) / f64::from(folder.completed_calls)
        };
        Self {
            folder,
            by_status,
            by_type,
            success_rate,
        }
    }
}

/// Owns the per-day folder aggregate.
pub struct DailyFolderLifecycle {
    ports: Ports,
    generator: TaskGenerator,
}

impl DailyFolderLifecycle {
    pub fn new(ports: Ports) -> Self {
        let generator = TaskGenerator::new(ports.clone());
        Self { ports, generator }
    }

    /// Current local date according to the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.ports.today()
    }

    /// Generates the folder for `date` and announces it.
    pub async fn generate(&self, date: NaiveDate) -> Result<Generated, LeaddeskError> {
        let generated = self.generator.generate(date).await?;
        self.ports
            .notifier
            .notify(NotificationEvent::FolderGenerated {
                folder: generated.folder.clone(),
                task_count: generated.tasks.len(),
            })
            .await;
        Ok(generated)
    }

    /// Closes the active folder for `date`, freezing its counters.
    pub async fn close(&self, date: NaiveDate) -> Result<DailyFolder, LeaddeskError> {
        let folder = self
            .ports
            .folders
            .folder_by_date(date)
            .await?
            .ok_or_else(|| LeaddeskError::not_found("folder", date.to_string()))?;
        match folder.status {
            FolderStatus::Active => {}
            FolderStatus::Completed => return Err(LeaddeskError::AlreadyClosed { date }),
            FolderStatus::Cancelled => {
                return Err(LeaddeskError::invalid_transition(
                    &folder.id,
                    "cannot close a cancelled folder",
                ));
            }
        }

        let written = self
            .ports
            .folders
            .close_folder(&folder.id, self.ports.now_utc())
            .await?;
        let closed = match written {
            WriteOutcome::Applied(closed) => closed,
            WriteOutcome::FolderInactive(FolderStatus::Completed) => {
                return Err(LeaddeskError::AlreadyClosed { date });
            }
            WriteOutcome::Missing => {
                return Err(LeaddeskError::not_found("folder", folder.id));
            }
            _ => {
                return Err(LeaddeskError::invalid_transition(
                    &folder.id,
                    "folder changed state while closing",
                ));
            }
        };

        info!(
            folder_id = %closed.id,
            %date,
            completed_calls = closed.completed_calls,
            successful_calls = closed.successful_calls,
            appointments_set = closed.appointments_set,
            "daily folder closed"
        );
        self.ports
            .notifier
            .notify(NotificationEvent::FolderClosed {
                folder: closed.clone(),
            })
            .await;
        Ok(closed)
    }

    pub async fn folder(&self, date: NaiveDate) -> Result<Option<DailyFolder>, LeaddeskError> {
        self.ports.folders.folder_by_date(date).await
    }

    /// The folder for `date` with its tasks, or `None` if not generated yet.
    pub async fn load(&self, date: NaiveDate) -> Result<Option<FolderView>, LeaddeskError> {
        let Some(folder) = self.ports.folders.folder_by_date(date).await? else {
            return Ok(None);
        };
        let tasks = self.ports.tasks.tasks_for_folder(&folder.id).await?;
        Ok(Some(FolderView { folder, tasks }))
    }

    pub async fn load_today(&self) -> Result<Option<FolderView>, LeaddeskError> {
        self.load(self.today()).await
    }

    /// Joins tasks with owner names for display. Unknown owners show their id.
    pub async fn rows(&self, tasks: Vec<DailyTaskItem>) -> Result<Vec<TaskRow>, LeaddeskError> {
        let names: HashMap<String, String> = self
            .ports
            .owners
            .list_owners()
            .await?
            .into_iter()
            .map(|o| (o.id, o.name))
            .collect();
        Ok(tasks
            .into_iter()
            .map(|task| {
                let owner_name = names
                    .get(&task.owner_id)
                    .cloned()
                    .unwrap_or_else(|| task.owner_id.clone());
                TaskRow { task, owner_name }
            })
            .collect())
    }

    pub async fn summary(&self, date: NaiveDate) -> Result<DailySummary, LeaddeskError> {
        let view = self
            .load(date)
            .await?
            .ok_or_else(|| LeaddeskError::not_found("folder", date.to_string()))?;
        Ok(DailySummary::build(view.folder, &view.tasks))
    }

    /// Most recent folders, newest first.
    pub async fn history(&self, limit: usize) -> Result<Vec<DailyFolder>, LeaddeskError> {
        self.ports.folders.recent_folders(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn summary_breaks_down_tasks() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let started = Utc.with_ymd_and_hms(2024, 1, 10, 7, 0, 0).unwrap();
        let mut folder = DailyFolder::open(date, started, 2, 1);
        folder.completed_calls = 4;
        folder.successful_calls = 1;
        let mut archived = DailyTaskItem::new(&folder.id, "a", TaskType::FollowUp, 3, None);
        archived.status = TaskStatus::Archived;
        let tasks = vec![
            archived,
            DailyTaskItem::new(&folder.id, "b", TaskType::NewContact, 2, None),
            DailyTaskItem::new(&folder.id, "c", TaskType::NewContact, 1, None),
        ];
        let summary = DailySummary::build(folder, &tasks);
        assert_eq!(summary.by_status.archived, 1);
        assert_eq!(summary.by_status.pending, 2);
        assert_eq!(summary.by_type.new_contact, 2);
        assert_eq!(summary.by_type.follow_up, 1);
        assert!((summary.success_rate - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_without_calls_has_zero_rate() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let started = Utc.with_ymd_and_hms(2024, 1, 10, 7, 0, 0).unwrap();
        let folder = DailyFolder::open(date, started, 0, 0);
        assert_eq!(DailySummary::build(folder, &[]).success_rate, 0.0);
    }
}
