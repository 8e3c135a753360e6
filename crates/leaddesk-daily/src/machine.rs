// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task state machine.
//!
//! ```text
//! pending ──start──> in_progress ──resolve──> archived
//!    │                    │                      │
//!    └──resolve/archive───┴──────archive─────────┘
//!                                                │
//! pending <──────────────restore─────────────────┘
//! ```
//!
//! Every mutation is a conditional write against the store: it only lands if
//! the task is still in an accepted state and its folder is still active. A
//! task deleted between the read and the write surfaces as `NotFound`.

use leaddesk_core::{
    Appointment, CallRecord, CounterDelta, DailyFolder, DailyTaskItem, LeaddeskError,
    NotificationEvent, PriorityClaim, Stamp, TaskChange, TaskChangeKind, TaskStatus, WriteOutcome,
};
use leaddesk_followup::{OutcomeCategory, derive_follow_up};
use tracing::{debug, info, warn};

use crate::ports::Ports;

const ACTIVE: &[TaskStatus] = &[TaskStatus::Pending, TaskStatus::InProgress];

/// What a successful `resolve` produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub task: DailyTaskItem,
    pub category: OutcomeCategory,
    /// The follow-up appointment booked for the owner, if the outcome called for one.
    pub follow_up: Option<Appointment>,
}

/// Drives single-task transitions.
pub struct TaskStateMachine {
    ports: Ports,
}

fn counters_for(category: OutcomeCategory) -> CounterDelta {
    CounterDelta {
        completed_calls: 1,
        successful_calls: u32::from(category.is_successful()),
        appointments_set: u32::from(category.sets_appointment()),
    }
}

/// Turns a conditional-write outcome into the caller-facing result.
fn settle<T>(id: &str, action: &str, outcome: WriteOutcome<T>) -> Result<T, LeaddeskError> {
    match outcome {
        WriteOutcome::Applied(value) => Ok(value),
        WriteOutcome::Missing => Err(LeaddeskError::not_found("task", id)),
        WriteOutcome::FolderInactive(status) => Err(LeaddeskError::invalid_transition(
            id,
            format!("cannot {action}: folder is {status}"),
        )),
        WriteOutcome::StatusMismatch(status) => Err(LeaddeskError::invalid_transition(
            id,
            format!("cannot {action} a task that is {status}"),
        )),
        WriteOutcome::Stale => Err(LeaddeskError::invalid_transition(
            id,
            format!("cannot {action}: priorities changed concurrently"),
        )),
    }
}

impl TaskStateMachine {
    pub fn new(ports: Ports) -> Self {
        Self { ports }
    }

    /// Loads a task and its folder, rejecting tasks of closed folders.
    async fn load(
        &self,
        id: &str,
        action: &str,
    ) -> Result<(DailyTaskItem, DailyFolder), LeaddeskError> {
        let task = self
            .ports
            .tasks
            .task(id)
            .await?
            .ok_or_else(|| LeaddeskError::not_found("task", id))?;
        let folder = self
            .ports
            .folders
            .folder_by_id(&task.folder_id)
            .await?
            .ok_or_else(|| LeaddeskError::not_found("folder", task.folder_id.clone()))?;
        if !folder.is_active() {
            return Err(LeaddeskError::invalid_transition(
                id,
                format!(
                    "cannot {action}: folder for {} is {}",
                    folder.date, folder.status
                ),
            ));
        }
        Ok((task, folder))
    }

    fn require(
        task: &DailyTaskItem,
        accepted: &[TaskStatus],
        action: &str,
    ) -> Result<(), LeaddeskError> {
        if accepted.contains(&task.status) {
            Ok(())
        } else {
            Err(LeaddeskError::invalid_transition(
                &task.id,
                format!("cannot {action} a task that is {}", task.status),
            ))
        }
    }

    async fn changed(&self, task: &DailyTaskItem, change: TaskChangeKind) {
        self.ports
            .notifier
            .notify(NotificationEvent::TaskChanged {
                task: task.clone(),
                change,
            })
            .await;
    }

    /// pending → in_progress: the agent is calling now.
    pub async fn start(&self, id: &str) -> Result<DailyTaskItem, LeaddeskError> {
        let (task, _) = self.load(id, "start").await?;
        Self::require(&task, &[TaskStatus::Pending], "start")?;

        let outcome = self
            .ports
            .tasks
            .apply_change(
                id,
                &[TaskStatus::Pending],
                &TaskChange::to(TaskStatus::InProgress),
                CounterDelta::default(),
            )
            .await?;
        let task = settle(id, "start", outcome)?;
        debug!(task_id = %id, owner_id = %task.owner_id, "call started");
        self.changed(&task, TaskChangeKind::Started).await;
        Ok(task)
    }

    /// pending | in_progress → archived with an outcome.
    ///
    /// The task change, the folder counters, the derived follow-up
    /// appointment, and the owner's last contact are written as one unit.
    /// If that write fails nothing changed and the resolve can be retried.
    pub async fn resolve(
        &self,
        id: &str,
        outcome: &str,
        notes: Option<String>,
    ) -> Result<Resolution, LeaddeskError> {
        let label = outcome.trim();
        if label.is_empty() {
            return Err(LeaddeskError::invalid_transition(
                id,
                "an outcome is required to resolve a task",
            ));
        }
        let (task, _) = self.load(id, "resolve").await?;
        Self::require(&task, ACTIVE, "resolve")?;

        let now = self.ports.now_utc();
        let category = OutcomeCategory::classify(label);
        let owner = self.ports.owners.owner(&task.owner_id).await?;
        if owner.is_none() {
            warn!(owner_id = %task.owner_id, task_id = %id, "owner missing, no follow-up booked");
        }
        let follow_up = owner.as_ref().and_then(|owner| {
            derive_follow_up(label, owner, self.ports.today())
                .map(|f| f.to_appointment(&owner.id, now))
        });
        let record = CallRecord {
            owner_id: task.owner_id.clone(),
            outcome: label.to_string(),
            contacted_at: now,
            follow_up: follow_up.clone(),
        };
        let change = TaskChange::to(TaskStatus::Archived)
            .with_outcome(label)
            .with_notes(notes)
            .stamped(Stamp::Set(now));
        let written = self
            .ports
            .tasks
            .resolve_task(id, ACTIVE, &change, counters_for(category), &record)
            .await?;
        let task = settle(id, "resolve", written)?;

        if let (Some(appointment), Some(owner)) = (&follow_up, owner) {
            self.ports
                .notifier
                .notify(NotificationEvent::FollowUpScheduled {
                    appointment: appointment.clone(),
                    owner_name: owner.name,
                })
                .await;
        }
        info!(
            task_id = %id,
            owner_id = %task.owner_id,
            outcome = %label,
            %category,
            follow_up = follow_up.is_some(),
            "task resolved"
        );
        self.changed(&task, TaskChangeKind::Resolved).await;
        Ok(Resolution {
            task,
            category,
            follow_up,
        })
    }

    /// Any non-terminal state → archived, without an outcome or follow-up.
    pub async fn archive_manual(&self, id: &str) -> Result<DailyTaskItem, LeaddeskError> {
        let (task, _) = self.load(id, "archive").await?;
        Self::require(&task, ACTIVE, "archive")?;

        let change = TaskChange::to(TaskStatus::Archived).stamped(Stamp::Set(self.ports.now_utc()));
        let written = self
            .ports
            .tasks
            .apply_change(id, ACTIVE, &change, CounterDelta::default())
            .await?;
        let task = settle(id, "archive", written)?;
        debug!(task_id = %id, "task archived manually");
        self.changed(&task, TaskChangeKind::Archived).await;
        Ok(task)
    }

    /// archived → pending, clearing `completed_at`.
    pub async fn restore(&self, id: &str) -> Result<DailyTaskItem, LeaddeskError> {
        let (task, _) = self.load(id, "restore").await?;
        Self::require(&task, &[TaskStatus::Archived], "restore")?;

        let change = TaskChange::to(TaskStatus::Pending).stamped(Stamp::Clear);
        let written = self
            .ports
            .tasks
            .apply_change(
                id,
                &[TaskStatus::Archived],
                &change,
                CounterDelta::default(),
            )
            .await?;
        let task = settle(id, "restore", written)?;
        debug!(task_id = %id, "task restored");
        self.changed(&task, TaskChangeKind::Restored).await;
        Ok(task)
    }

    /// Active tasks of a folder in rank order.
    async fn ranked(&self, folder_id: &str) -> Result<Vec<DailyTaskItem>, LeaddeskError> {
        let mut tasks = self.ports.tasks.tasks_for_folder(folder_id).await?;
        tasks.retain(|t| t.status.is_active());
        tasks.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(tasks)
    }

    /// Swaps the priorities of two active tasks adjacent in rank order.
    pub async fn reorder(
        &self,
        first: &str,
        second: &str,
    ) -> Result<(DailyTaskItem, DailyTaskItem), LeaddeskError> {
        if first == second {
            return Err(LeaddeskError::invalid_transition(
                first,
                "cannot reorder a task with itself",
            ));
        }
        let (a, _) = self.load(first, "reorder").await?;
        let (b, _) = self.load(second, "reorder").await?;
        if a.folder_id != b.folder_id {
            return Err(LeaddeskError::invalid_transition(
                first,
                format!("cannot reorder: `{second}` belongs to another folder"),
            ));
        }
        Self::require(&a, ACTIVE, "reorder")?;
        Self::require(&b, ACTIVE, "reorder")?;

        let ranked = self.ranked(&a.folder_id).await?;
        let pos = |id: &str| ranked.iter().position(|t| t.id == id);
        let adjacent = match (pos(first), pos(second)) {
            (Some(i), Some(j)) => i.abs_diff(j) == 1,
            _ => false,
        };
        if !adjacent {
            return Err(LeaddeskError::invalid_transition(
                first,
                format!("cannot reorder: `{second}` is not adjacent in priority order"),
            ));
        }

        let written = self
            .ports
            .tasks
            .swap_priorities(
                &PriorityClaim {
                    task_id: a.id.clone(),
                    priority: a.priority,
                },
                &PriorityClaim {
                    task_id: b.id.clone(),
                    priority: b.priority,
                },
            )
            .await?;
        let (a, b) = settle(first, "reorder", written)?;
        debug!(first = %a.id, second = %b.id, "tasks reordered");
        self.changed(&a, TaskChangeKind::Reordered).await;
        self.changed(&b, TaskChangeKind::Reordered).await;
        Ok((a, b))
    }

    /// Swaps a task with the one ranked directly above it.
    pub async fn move_up(
        &self,
        id: &str,
    ) -> Result<(DailyTaskItem, DailyTaskItem), LeaddeskError> {
        self.move_by(id, -1).await
    }

    /// Swaps a task with the one ranked directly below it.
    pub async fn move_down(
        &self,
        id: &str,
    ) -> Result<(DailyTaskItem, DailyTaskItem), LeaddeskError> {
        self.move_by(id, 1).await
    }

    async fn move_by(
        &self,
        id: &str,
        step: isize,
    ) -> Result<(DailyTaskItem, DailyTaskItem), LeaddeskError> {
        let (task, _) = self.load(id, "reorder").await?;
        Self::require(&task, ACTIVE, "reorder")?;
        let ranked = self.ranked(&task.folder_id).await?;
        let neighbour = ranked
            .iter()
            .position(|t| t.id == id)
            .and_then(|i| i.checked_add_signed(step))
            .and_then(|j| ranked.get(j))
            .ok_or_else(|| {
                let edge = if step < 0 { "top" } else { "bottom" };
                LeaddeskError::invalid_transition(id, format!("task is already at the {edge}"))
            })?;
        let neighbour = neighbour.id.clone();
        self.reorder(id, &neighbour).await
    }

    /// Replaces the task's notes, in any task state.
    pub async fn edit_notes(&self, id: &str, notes: &str) -> Result<DailyTaskItem, LeaddeskError> {
        self.load(id, "edit notes").await?;
        let written = self.ports.tasks.set_notes(id, notes).await?;
        let task = settle(id, "edit notes", written)?;
        self.changed(&task, TaskChangeKind::NotesEdited).await;
        Ok(task)
    }

    /// Hard-deletes a task, in any task state. Irreversible.
    pub async fn delete(&self, id: &str) -> Result<(), LeaddeskError> {
        let (task, _) = self.load(id, "delete").await?;
        let written = self.ports.tasks.delete_task(id).await?;
        settle(id, "delete", written)?;
        info!(task_id = %id, folder_id = %task.folder_id, "task deleted");
        self.ports
            .notifier
            .notify(NotificationEvent::TaskDeleted {
                task_id: task.id,
                folder_id: task.folder_id,
            })
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_follow_outcome_category() {
        assert_eq!(
            counters_for(OutcomeCategory::CallBack),
            CounterDelta {
                completed_calls: 1,
                successful_calls: 0,
                appointments_set: 0
            }
        );
        assert_eq!(
            counters_for(OutcomeCategory::Interested),
            CounterDelta {
                completed_calls: 1,
                successful_calls: 1,
                appointments_set: 0
            }
        );
        assert_eq!(
            counters_for(OutcomeCategory::AppointmentSet),
            CounterDelta {
                completed_calls: 1,
                successful_calls: 1,
                appointments_set: 1
            }
        );
    }

    #[test]
    fn settle_maps_write_outcomes_to_errors() {
        assert!(matches!(
            settle::<()>("t1", "start", WriteOutcome::Missing),
            Err(LeaddeskError::NotFound { .. })
        ));
        assert!(matches!(
            settle::<()>(
                "t1",
                "start",
                WriteOutcome::FolderInactive(leaddesk_core::FolderStatus::Completed)
            ),
            Err(LeaddeskError::InvalidTransition { .. })
        ));
        assert!(matches!(
            settle::<()>("t1", "reorder", WriteOutcome::Stale),
            Err(LeaddeskError::InvalidTransition { .. })
        ));
        assert_eq!(settle("t1", "start", WriteOutcome::Applied(7)).unwrap(), 7);
    }
}
