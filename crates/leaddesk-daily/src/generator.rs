// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task generation: materializes a day's folder and its worklist.

use chrono::NaiveDate;
use leaddesk_core::{DailyFolder, DailyTaskItem, LeaddeskError};
use tracing::{debug, error, info};

use crate::ports::Ports;
use crate::priority::plan_tasks;

/// A freshly generated folder together with its items, highest priority first.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub folder: DailyFolder,
    pub tasks: Vec<DailyTaskItem>,
}

/// Builds a day's folder from the owner roster and the calendar.
pub struct TaskGenerator {
    ports: Ports,
}

impl TaskGenerator {
    pub fn new(ports: Ports) -> Self {
        Self { ports }
    }

    /// Generates the folder for `date`.
    ///
    /// Refuses with [`LeaddeskError::AlreadyGenerated`] if a folder for the
    /// date exists, including when a concurrent generator wins the race at
    /// insert time. The folder and its items are written as one unit; the
    /// stored item count is then verified against the plan.
    pub async fn generate(&self, date: NaiveDate) -> Result<Generated, LeaddeskError> {
        if self.ports.folders.folder_by_date(date).await?.is_some() {
            debug!(%date, "folder already exists, refusing to generate");
            return Err(LeaddeskError::AlreadyGenerated { date });
        }

        let owners = self.ports.owners.list_owners().await?;
        let appointments = self.ports.calendar.appointments_on(date).await?;
        let plan = plan_tasks(date, &owners, &appointments);

        let folder = DailyFolder::open(
            date,
            self.ports.now_utc(),
            plan.new_contacts(),
            plan.followups(),
        );
        let tasks: Vec<DailyTaskItem> = plan
            .tasks
            .iter()
            .map(|t| {
                DailyTaskItem::new(
                    &folder.id,
                    &t.owner_id,
                    t.task_type,
                    t.priority,
                    t.scheduled_time,
                )
            })
            .collect();

        self.ports.folders.insert_generation(&folder, &tasks).await?;

        let stored = self.ports.tasks.count_tasks(&folder.id).await?;
        if stored != tasks.len() {
            error!(
                folder_id = %folder.id,
                %date,
                expected = tasks.len(),
                actual = stored,
                "generated folder has inconsistent item count"
            );
            return Err(LeaddeskError::GenerationPartialFailure {
                folder_id: folder.id,
                expected: tasks.len(),
                actual: stored,
            });
        }

        info!(
            folder_id = %folder.id,
            %date,
            total_contacts = folder.total_contacts,
            total_followups = folder.total_followups,
            owners = owners.len(),
            "daily folder generated"
        );
        Ok(Generated { folder, tasks })
    }
}
