// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the generator, the state machine, the scheduler,
//! and every storage backend.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a [`DailyFolder`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FolderStatus {
    /// Tasks can still be worked.
    Active,
    /// Closed for the day. Terminal and immutable.
    Completed,
    /// Administratively cancelled. Terminal.
    Cancelled,
}

/// Why an owner was put in today's folder.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Owner never contacted.
    NewContact,
    /// Owner has a follow-up appointment due on the folder date.
    FollowUp,
    /// Owner's last outcome asked for a retry that falls on the folder date.
    Callback,
}

impl TaskType {
    /// Ordering weight: follow_up > callback > new_contact.
    pub fn rank(self) -> u8 {
        match self {
            TaskType::FollowUp => 3,
            TaskType::Callback => 2,
            TaskType::NewContact => 1,
        }
    }
}

/// Status of a single [`DailyTaskItem`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
    Archived,
}

impl TaskStatus {
    /// Pending and in-progress tasks make up the active worklist.
    pub fn is_active(self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

/// Lead-heat classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Temperature {
    Hot,
    Warm,
    Cold,
}

impl Temperature {
    /// Ordering weight: HOT > WARM > COLD. Unknown temperature ranks 0.
    pub fn rank(temperature: Option<Temperature>) -> u8 {
        match temperature {
            Some(Temperature::Hot) => 3,
            Some(Temperature::Warm) => 2,
            Some(Temperature::Cold) => 1,
            None => 0,
        }
    }
}

/// Kind of follow-up appointment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentType {
    Call,
    Visit,
}

/// The per-day aggregate of call tasks. At most one per calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFolder {
    pub id: String,
    pub date: NaiveDate,
    pub status: FolderStatus,
    /// New-contact tasks created at generation.
    pub total_contacts: u32,
    /// Follow-up and callback tasks created at generation.
    pub total_followups: u32,
    pub completed_calls: u32,
    pub successful_calls: u32,
    pub appointments_set: u32,
    pub started_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl DailyFolder {
    /// A fresh active folder with zeroed run-time counters.
    pub fn open(
        date: NaiveDate,
        started_at: DateTime<Utc>,
        total_contacts: u32,
        total_followups: u32,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            status: FolderStatus::Active,
            total_contacts,
            total_followups,
            completed_calls: 0,
            successful_calls: 0,
            appointments_set: 0,
            started_at,
            closed_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == FolderStatus::Active
    }

    pub fn counters(&self) -> FolderCounters {
        FolderCounters {
            completed_calls: self.completed_calls,
            successful_calls: self.successful_calls,
            appointments_set: self.appointments_set,
        }
    }
}

/// Snapshot of a folder's run-time counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderCounters {
    pub completed_calls: u32,
    pub successful_calls: u32,
    pub appointments_set: u32,
}

/// Increments applied to a folder's counters together with a task change.
///
/// Increments are unsigned, which keeps the counters non-decreasing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterDelta {
    pub completed_calls: u32,
    pub successful_calls: u32,
    pub appointments_set: u32,
}

impl CounterDelta {
    pub fn is_zero(&self) -> bool {
        self.completed_calls == 0 && self.successful_calls == 0 && self.appointments_set == 0
    }

    pub fn apply(&self, folder: &mut DailyFolder) {
        folder.completed_calls += self.completed_calls;
        folder.successful_calls += self.successful_calls;
        folder.appointments_set += self.appointments_set;
    }
}

/// One owner-to-call unit within a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTaskItem {
    pub id: String,
    pub folder_id: String,
    pub owner_id: String,
    pub task_type: TaskType,
    /// Higher is called sooner. Unique within a folder.
    pub priority: i64,
    pub scheduled_time: Option<NaiveTime>,
    pub status: TaskStatus,
    /// Free-form outcome label recorded on resolution.
    pub call_outcome: Option<String>,
    pub notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl DailyTaskItem {
    pub fn new(
        folder_id: &str,
        owner_id: &str,
        task_type: TaskType,
        priority: i64,
        scheduled_time: Option<NaiveTime>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            folder_id: folder_id.to_string(),
            owner_id: owner_id.to_string(),
            task_type,
            priority,
            scheduled_time,
            status: TaskStatus::Pending,
            call_outcome: None,
            notes: None,
            completed_at: None,
        }
    }
}

/// Property owner, as exposed by the CRM's owner registry.
///
/// Only `temperature`, `last_outcome` (the CRM's `esitoChiamata`) and
/// `last_contact` drive scheduling; name and address feed the scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub temperature: Option<Temperature>,
    pub last_outcome: Option<String>,
    pub last_contact: Option<DateTime<Utc>>,
}

impl Owner {
    /// First whitespace-separated token of the owner's name.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }

    /// True when the owner has never been contacted.
    pub fn is_uncontacted(&self) -> bool {
        self.last_contact.is_none()
    }
}

/// A calendar appointment for an owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub owner_id: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub appointment_type: AppointmentType,
    pub title: String,
    pub whatsapp_script: Option<String>,
    pub voice_script: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Durable local record of when each daily trigger last fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerState {
    pub last_generated: Option<NaiveDate>,
    pub last_closed: Option<NaiveDate>,
}

impl SchedulerState {
    pub fn generated_on(&self, date: NaiveDate) -> bool {
        self.last_generated == Some(date)
    }

    pub fn closed_on(&self, date: NaiveDate) -> bool {
        self.last_closed == Some(date)
    }
}

/// Kind of mutation reported in [`NotificationEvent::TaskChanged`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskChangeKind {
    Started,
    Resolved,
    Archived,
    Restored,
    Reordered,
    NotesEdited,
}

/// Outbound change event emitted after every successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationEvent {
    FolderGenerated {
        folder: DailyFolder,
        task_count: usize,
    },
    FolderClosed {
        folder: DailyFolder,
    },
    TaskChanged {
        task: DailyTaskItem,
        change: TaskChangeKind,
    },
    TaskDeleted {
        task_id: String,
        folder_id: String,
    },
    FollowUpScheduled {
        appointment: Appointment,
        owner_name: String,
    },
}

impl NotificationEvent {
    /// Short machine-readable label, used as the outbox `kind` column.
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::FolderGenerated { .. } => "folder_generated",
            NotificationEvent::FolderClosed { .. } => "folder_closed",
            NotificationEvent::TaskChanged { .. } => "task_changed",
            NotificationEvent::TaskDeleted { .. } => "task_deleted",
            NotificationEvent::FollowUpScheduled { .. } => "follow_up_scheduled",
        }
    }
}
