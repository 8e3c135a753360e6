// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the data-store ports.
//!
//! Mirrors the SQLite store's conditional-write semantics so lifecycle tests
//! can run without a database file.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use leaddesk_core::{
    Appointment, AppointmentBook, CallRecord, CounterDelta, DailyFolder, DailyTaskItem,
    FolderStatus, FolderStore, LeaddeskError, Owner, OwnerDirectory, PriorityClaim, TaskChange,
    TaskStatus, TaskStore, WriteOutcome,
};

#[derive(Debug, Default)]
struct Inner {
    owners: Vec<Owner>,
    appointments: Vec<Appointment>,
    folders: Vec<DailyFolder>,
    /// Insertion order breaks priority ties, like SQLite's rowid.
    tasks: Vec<DailyTaskItem>,
    /// When set, generation keeps only this many items.
    truncate_generation: Option<usize>,
    calendar_offline: bool,
}

enum Precondition {
    Missing,
    FolderInactive(FolderStatus),
    Ready(usize),
}

impl Inner {
    fn check(&self, id: &str) -> Precondition {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return Precondition::Missing;
        };
        let folder_id = &self.tasks[index].folder_id;
        match self.folders.iter().find(|f| &f.id == folder_id) {
            None => Precondition::Missing,
            Some(f) if f.status == FolderStatus::Active => Precondition::Ready(index),
            Some(f) => Precondition::FolderInactive(f.status),
        }
    }

    fn calendar_check(&self) -> Result<(), LeaddeskError> {
        if self.calendar_offline {
            return Err(LeaddeskError::data_access(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "calendar unavailable",
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }

    /// Adds an owner at the end of the listing, or replaces it in place.
    pub fn add_owner(&self, owner: Owner) {
        let mut inner = self.lock();
        match inner.owners.iter_mut().find(|o| o.id == owner.id) {
            Some(existing) => *existing = owner,
            None => inner.owners.push(owner),
        }
    }

    pub fn add_appointment(&self, appointment: Appointment) {
        self.lock().appointments.push(appointment);
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        self.lock().appointments.clone()
    }

    pub fn folders(&self) -> Vec<DailyFolder> {
        self.lock().folders.clone()
    }

    /// Forces a folder into `status`, bypassing the lifecycle.
    pub fn set_folder_status(&self, date: NaiveDate, status: FolderStatus) {
        if let Some(folder) = self.lock().folders.iter_mut().find(|f| f.date == date) {
            folder.status = status;
        }
    }

    /// Makes every appointment write fail with a data-access error.
    pub fn set_calendar_offline(&self, offline: bool) {
        self.lock().calendar_offline = offline;
    }

    /// Simulates a backend that silently drops items during generation.
    pub fn truncate_generation(&self, keep: Option<usize>) {
        self.lock().truncate_generation = keep;
    }
}

#[async_trait]
impl FolderStore for MemoryStore {
    async fn folder_by_date(&self, date: NaiveDate) -> Result<Option<DailyFolder>, LeaddeskError> {
        Ok(self.lock().folders.iter().find(|f| f.date == date).cloned())
    }

    async fn folder_by_id(&self, id: &str) -> Result<Option<DailyFolder>, LeaddeskError> {
        Ok(self.lock().folders.iter().find(|f| f.id == id).cloned())
    }

    async fn insert_generation(
        &self,
        folder: &DailyFolder,
        tasks: &[DailyTaskItem],
    ) -> Result<(), LeaddeskError> {
        let mut inner = self.lock();
        if inner.folders.iter().any(|f| f.date == folder.date) {
            return Err(LeaddeskError::AlreadyGenerated { date: folder.date });
        }
        for (i, task) in tasks.iter().enumerate() {
            if tasks[..i].iter().any(|t| t.owner_id == task.owner_id) {
                return Err(LeaddeskError::Internal(format!(
                    "duplicate owner `{}` in folder",
                    task.owner_id
                )));
            }
        }
        let keep = inner.truncate_generation.unwrap_or(tasks.len()).min(tasks.len());
        inner.folders.push(folder.clone());
        inner.tasks.extend_from_slice(&tasks[..keep]);
        Ok(())
    }

    async fn close_folder(
        &self,
        id: &str,
        closed_at: DateTime<Utc>,
    ) -> Result<WriteOutcome<DailyFolder>, LeaddeskError> {
        let mut inner = self.lock();
        let Some(folder) = inner.folders.iter_mut().find(|f| f.id == id) else {
            return Ok(WriteOutcome::Missing);
        };
        if folder.status != FolderStatus::Active {
            return Ok(WriteOutcome::FolderInactive(folder.status));
        }
        folder.status = FolderStatus::Completed;
        folder.closed_at = Some(closed_at);
        Ok(WriteOutcome::Applied(folder.clone()))
    }

    async fn recent_folders(&self, limit: usize) -> Result<Vec<DailyFolder>, LeaddeskError> {
        let mut folders = self.lock().folders.clone();
        folders.sort_by(|a, b| b.date.cmp(&a.date));
        folders.truncate(limit);
        Ok(folders)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn task(&self, id: &str) -> Result<Option<DailyTaskItem>, LeaddeskError> {
        Ok(self.lock().tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn tasks_for_folder(
        &self,
        folder_id: &str,
    ) -> Result<Vec<DailyTaskItem>, LeaddeskError> {
        let mut tasks: Vec<DailyTaskItem> = self
            .lock()
            .tasks
            .iter()
            .filter(|t| t.folder_id == folder_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(tasks)
    }

    async fn count_tasks(&self, folder_id: &str) -> Result<usize, LeaddeskError> {
        Ok(self
            .lock()
            .tasks
            .iter()
            .filter(|t| t.folder_id == folder_id)
            .count())
    }

    async fn apply_change(
        &self,
        id: &str,
        expected: &[TaskStatus],
        change: &TaskChange,
        counters: CounterDelta,
    ) -> Result<WriteOutcome<DailyTaskItem>, LeaddeskError> {
        let mut inner = self.lock();
        let index = match inner.check(id) {
            Precondition::Missing => return Ok(WriteOutcome::Missing),
            Precondition::FolderInactive(s) => return Ok(WriteOutcome::FolderInactive(s)),
            Precondition::Ready(index) => index,
        };
        let status = inner.tasks[index].status;
        if !expected.contains(&status) {
            return Ok(WriteOutcome::StatusMismatch(status));
        }
        change.apply(&mut inner.tasks[index]);
        let task = inner.tasks[index].clone();
        if let Some(folder) = inner.folders.iter_mut().find(|f| f.id == task.folder_id) {
            counters.apply(folder);
        }
        Ok(WriteOutcome::Applied(task))
    }

    async fn resolve_task(
        &self,
        id: &str,
        expected: &[TaskStatus],
        change: &TaskChange,
        counters: CounterDelta,
        record: &CallRecord,
    ) -> Result<WriteOutcome<DailyTaskItem>, LeaddeskError> {
        let mut inner = self.lock();
        let index = match inner.check(id) {
            Precondition::Missing => return Ok(WriteOutcome::Missing),
            Precondition::FolderInactive(s) => return Ok(WriteOutcome::FolderInactive(s)),
            Precondition::Ready(index) => index,
        };
        let status = inner.tasks[index].status;
        if !expected.contains(&status) {
            return Ok(WriteOutcome::StatusMismatch(status));
        }
        if record.follow_up.is_some() {
            inner.calendar_check()?;
        }

        change.apply(&mut inner.tasks[index]);
        let task = inner.tasks[index].clone();
        if let Some(folder) = inner.folders.iter_mut().find(|f| f.id == task.folder_id) {
            counters.apply(folder);
        }
        if let Some(appointment) = &record.follow_up {
            inner.appointments.push(appointment.clone());
        }
        if let Some(owner) = inner.owners.iter_mut().find(|o| o.id == record.owner_id) {
            owner.last_outcome = Some(record.outcome.clone());
            owner.last_contact = Some(record.contacted_at);
        }
        Ok(WriteOutcome::Applied(task))
    }

    async fn set_notes(
        &self,
        id: &str,
        notes: &str,
    ) -> Result<WriteOutcome<DailyTaskItem>, LeaddeskError> {
        let mut inner = self.lock();
        match inner.check(id) {
            Precondition::Missing => Ok(WriteOutcome::Missing),
            Precondition::FolderInactive(s) => Ok(WriteOutcome::FolderInactive(s)),
            Precondition::Ready(index) => {
                inner.tasks[index].notes = Some(notes.to_string());
                Ok(WriteOutcome::Applied(inner.tasks[index].clone()))
            }
        }
    }

    async fn swap_priorities(
        &self,
        first: &PriorityClaim,
        second: &PriorityClaim,
    ) -> Result<WriteOutcome<(DailyTaskItem, DailyTaskItem)>, LeaddeskError> {
        let mut inner = self.lock();
        let mut indexes = [0usize; 2];
        for (slot, claim) in indexes.iter_mut().zip([first, second]) {
            match inner.check(&claim.task_id) {
                Precondition::Missing => return Ok(WriteOutcome::Missing),
                Precondition::FolderInactive(s) => return Ok(WriteOutcome::FolderInactive(s)),
                Precondition::Ready(index) if inner.tasks[index].priority != claim.priority => {
                    return Ok(WriteOutcome::Stale);
                }
                Precondition::Ready(index) => *slot = index,
            }
        }
        let [a, b] = indexes;
        inner.tasks[a].priority = second.priority;
        inner.tasks[b].priority = first.priority;
        Ok(WriteOutcome::Applied((
            inner.tasks[a].clone(),
            inner.tasks[b].clone(),
        )))
    }

    async fn delete_task(&self, id: &str) -> Result<WriteOutcome<()>, LeaddeskError> {
        let mut inner = self.lock();
        match inner.check(id) {
            Precondition::Missing => Ok(WriteOutcome::Missing),
            Precondition::FolderInactive(s) => Ok(WriteOutcome::FolderInactive(s)),
            Precondition::Ready(index) => {
                inner.tasks.remove(index);
                Ok(WriteOutcome::Applied(()))
            }
        }
    }
}

#[async_trait]
impl OwnerDirectory for MemoryStore {
    async fn list_owners(&self) -> Result<Vec<Owner>, LeaddeskError> {
        Ok(self.lock().owners.clone())
    }

    async fn owner(&self, id: &str) -> Result<Option<Owner>, LeaddeskError> {
        Ok(self.lock().owners.iter().find(|o| o.id == id).cloned())
    }

    async fn record_contact(
        &self,
        owner_id: &str,
        outcome: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, LeaddeskError> {
        let mut inner = self.lock();
        let Some(owner) = inner.owners.iter_mut().find(|o| o.id == owner_id) else {
            return Ok(false);
        };
        owner.last_outcome = Some(outcome.to_string());
        owner.last_contact = Some(at);
        Ok(true)
    }
}

#[async_trait]
impl AppointmentBook for MemoryStore {
    async fn appointments_on(&self, date: NaiveDate) -> Result<Vec<Appointment>, LeaddeskError> {
        let mut found: Vec<Appointment> = self
            .lock()
            .appointments
            .iter()
            .filter(|a| a.date == date)
            .cloned()
            .collect();
        // Timed appointments first, like the SQLite ordering.
        found.sort_by_key(|a| (a.time.is_none(), a.time));
        Ok(found)
    }

    async fn insert_appointment(&self, appointment: &Appointment) -> Result<(), LeaddeskError> {
        let mut inner = self.lock();
        inner.calendar_check()?;
        inner.appointments.push(appointment.clone());
        Ok(())
    }
}
