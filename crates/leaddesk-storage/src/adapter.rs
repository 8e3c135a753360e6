// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the lifecycle ports.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use leaddesk_config::model::StorageConfig;
use leaddesk_core::{
    Appointment, AppointmentBook, CallRecord, CounterDelta, DailyFolder, DailyTaskItem,
    FolderStore, LeaddeskError, NotificationEvent, Notifier, Owner, OwnerDirectory, PriorityClaim,
    TaskChange, TaskStatus, TaskStore, WriteOutcome,
};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::database::Database;
use crate::queries;
use crate::queries::notifications::OutboxEntry;

/// SQLite-backed store for folders, tasks, owners, appointments, and the
/// notification outbox.
///
/// The database is lazily opened on the first call to [`SqliteStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`](Self::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Creates and initializes a store in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, LeaddeskError> {
        let store = Self::new(config);
        store.initialize().await?;
        Ok(store)
    }

    fn db(&self) -> Result<&Database, LeaddeskError> {
        self.db
            .get()
            .ok_or_else(|| {
                LeaddeskError::Internal("storage not initialized -- call initialize() first".into())
            })
    }

    pub async fn initialize(&self) -> Result<(), LeaddeskError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| LeaddeskError::Internal("storage already initialized".into()))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoints the WAL before shutdown.
    pub async fn close(&self) -> Result<(), LeaddeskError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    pub async fn upsert_owner(&self, owner: &Owner) -> Result<(), LeaddeskError> {
        queries::owners::upsert_owner(self.db()?, owner).await
    }

    pub async fn appointments_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<Appointment>, LeaddeskError> {
        queries::appointments::appointments_for_owner(self.db()?, owner_id).await
    }

    pub async fn pending_notifications(
        &self,
        limit: usize,
    ) -> Result<Vec<OutboxEntry>, LeaddeskError> {
        queries::notifications::pending(self.db()?, limit).await
    }

    pub async fn mark_delivered(&self, id: i64) -> Result<(), LeaddeskError> {
        queries::notifications::mark_delivered(self.db()?, id).await
    }
}

#[async_trait]
impl FolderStore for SqliteStore {
    async fn folder_by_date(&self, date: NaiveDate) -> Result<Option<DailyFolder>, LeaddeskError> {
        queries::folders::folder_by_date(self.db()?, date).await
    }

    async fn folder_by_id(&self, id: &str) -> Result<Option<DailyFolder>, LeaddeskError> {
        queries::folders::folder_by_id(self.db()?, id).await
    }

    async fn insert_generation(
        &self,
        folder: &DailyFolder,
        tasks: &[DailyTaskItem],
    ) -> Result<(), LeaddeskError> {
        queries::folders::insert_generation(self.db()?, folder, tasks).await
    }

    async fn close_folder(
        &self,
        id: &str,
        closed_at: DateTime<Utc>,
    ) -> Result<WriteOutcome<DailyFolder>, LeaddeskError> {
        queries::folders::close_folder(self.db()?, id, closed_at).await
    }

    async fn recent_folders(&self, limit: usize) -> Result<Vec<DailyFolder>, LeaddeskError> {
        queries::folders::recent_folders(self.db()?, limit).await
    }
}

#[async_trait]
impl TaskStore for SqliteStore {
    async fn task(&self, id: &str) -> Result<Option<DailyTaskItem>, LeaddeskError> {
        queries::tasks::task(self.db()?, id).await
    }

    async fn tasks_for_folder(
        &self,
        folder_id: &str,
    ) -> Result<Vec<DailyTaskItem>, LeaddeskError> {
        queries::tasks::tasks_for_folder(self.db()?, folder_id).await
    }

    async fn count_tasks(&self, folder_id: &str) -> Result<usize, LeaddeskError> {
        queries::tasks::count_tasks(self.db()?, folder_id).await
    }

    async fn apply_change(
        &self,
        id: &str,
        expected: &[TaskStatus],
        change: &TaskChange,
        counters: CounterDelta,
    ) -> Result<WriteOutcome<DailyTaskItem>, LeaddeskError> {
        queries::tasks::apply_change(self.db()?, id, expected, change, counters).await
    }

    async fn resolve_task(
        &self,
        id: &str,
        expected: &[TaskStatus],
        change: &TaskChange,
        counters: CounterDelta,
        record: &CallRecord,
    ) -> Result<WriteOutcome<DailyTaskItem>, LeaddeskError> {
        queries::tasks::resolve_task(self.db()?, id, expected, change, counters, record).await
    }

    async fn set_notes(
        &self,
        id: &str,
        notes: &str,
    ) -> Result<WriteOutcome<DailyTaskItem>, LeaddeskError> {
        queries::tasks::set_notes(self.db()?, id, notes).await
    }

    async fn swap_priorities(
        &self,
        first: &PriorityClaim,
        second: &PriorityClaim,
    ) -> Result<WriteOutcome<(DailyTaskItem, DailyTaskItem)>, LeaddeskError> {
        queries::tasks::swap_priorities(self.db()?, first, second).await
    }

    async fn delete_task(&self, id: &str) -> Result<WriteOutcome<()>, LeaddeskError> {
        queries::tasks::delete_task(self.db()?, id).await
    }
}

#[async_trait]
impl OwnerDirectory for SqliteStore {
    async fn list_owners(&self) -> Result<Vec<Owner>, LeaddeskError> {
        queries::owners::list_owners(self.db()?).await
    }

    async fn owner(&self, id: &str) -> Result<Option<Owner>, LeaddeskError> {
        queries::owners::owner(self.db()?, id).await
    }

    async fn record_contact(
        &self,
        owner_id: &str,
        outcome: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, LeaddeskError> {
        queries::owners::record_contact(self.db()?, owner_id, outcome, at).await
    }
}

#[async_trait]
impl AppointmentBook for SqliteStore {
    async fn appointments_on(&self, date: NaiveDate) -> Result<Vec<Appointment>, LeaddeskError> {
        queries::appointments::appointments_on(self.db()?, date).await
    }

    async fn insert_appointment(&self, appointment: &Appointment) -> Result<(), LeaddeskError> {
        queries::appointments::insert_appointment(self.db()?, appointment).await
    }
}

/// Writes every event to the `notifications` outbox.
#[async_trait]
impl Notifier for SqliteStore {
    async fn notify(&self, event: NotificationEvent) {
        let kind = event.kind();
        let payload = match serde_json::to_string(&event) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(kind, error = %e, "failed to serialize notification");
                return;
            }
        };
        let db = match self.db() {
            Ok(db) => db,
            Err(e) => {
                warn!(kind, error = %e, "notification dropped");
                return;
            }
        };
        if let Err(e) = queries::notifications::enqueue(db, kind, payload).await {
            warn!(kind, error = %e, "failed to enqueue notification");
        }
    }
}
