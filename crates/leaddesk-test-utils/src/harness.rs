// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full lifecycle stack (folder lifecycle, task
//! state machine, and triggers) over either the in-memory store or a temp
//! SQLite database, with a settable clock and a recording notifier.

use std::sync::Arc;

use chrono::NaiveDate;
use leaddesk_config::model::StorageConfig;
use leaddesk_core::{Appointment, AppointmentBook, LeaddeskError, Owner, SchedulerState};
use leaddesk_daily::{DailyFolderLifecycle, Ports, TaskStateMachine};
use leaddesk_scheduler::{TriggerHours, TriggerService};
use leaddesk_storage::SqliteStore;

use crate::clock::FixedClock;
use crate::memory_store::MemoryStore;
use crate::notifier::RecordingNotifier;
use crate::state_store::MemoryStateStore;

/// Which data store backs the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Memory,
    Sqlite,
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    owners: Vec<Owner>,
    appointments: Vec<Appointment>,
    date: NaiveDate,
    hour: u32,
    minute: u32,
    hours: TriggerHours,
    backend: Backend,
    state: SchedulerState,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            owners: Vec::new(),
            appointments: Vec::new(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap_or_default(),
            hour: 9,
            minute: 0,
            hours: TriggerHours::default(),
            backend: Backend::Memory,
            state: SchedulerState::default(),
        }
    }

    /// Owners in listing order.
    pub fn with_owners(mut self, owners: Vec<Owner>) -> Self {
        self.owners = owners;
        self
    }

    pub fn with_appointments(mut self, appointments: Vec<Appointment>) -> Self {
        self.appointments = appointments;
        self
    }

    /// Starts the clock at `hour:minute` local time on `date`.
    pub fn at(mut self, date: NaiveDate, hour: u32, minute: u32) -> Self {
        self.date = date;
        self.hour = hour;
        self.minute = minute;
        self
    }

    pub fn with_trigger_hours(mut self, hours: TriggerHours) -> Self {
        self.hours = hours;
        self
    }

    /// Pre-seeds the trigger state store.
    pub fn with_scheduler_state(mut self, state: SchedulerState) -> Self {
        self.state = state;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, LeaddeskError> {
        let clock = Arc::new(FixedClock::at(self.date, self.hour, self.minute));
        let notifier = Arc::new(RecordingNotifier::new());
        let state_store = Arc::new(MemoryStateStore::with_state(self.state));

        let (ports, memory, sqlite, temp_dir) = match self.backend {
            Backend::Memory => {
                let store = Arc::new(MemoryStore::new());
                for owner in self.owners {
                    store.add_owner(owner);
                }
                for appointment in self.appointments {
                    store.add_appointment(appointment);
                }
                let ports = Ports::from_backend(store.clone(), notifier.clone(), clock.clone());
                (ports, Some(store), None, None)
            }
            Backend::Sqlite => {
                let temp_dir = tempfile::TempDir::new().map_err(LeaddeskError::data_access)?;
                let db_path = temp_dir.path().join("test.db");
                let store = Arc::new(
                    SqliteStore::open(StorageConfig {
                        database_path: db_path.to_string_lossy().to_string(),
                        wal_mode: true,
                    })
                    .await?,
                );
                for owner in &self.owners {
                    store.upsert_owner(owner).await?;
                }
                for appointment in &self.appointments {
                    store.insert_appointment(appointment).await?;
                }
                let ports = Ports::from_backend(store.clone(), notifier.clone(), clock.clone());
                (ports, None, Some(store), Some(temp_dir))
            }
        };

        let lifecycle = Arc::new(DailyFolderLifecycle::new(ports.clone()));
        let machine = TaskStateMachine::new(ports.clone());
        let triggers = TriggerService::restore(
            lifecycle.clone(),
            state_store.clone(),
            clock.clone(),
            self.hours,
        )
        .await?;

        Ok(TestHarness {
            ports,
            lifecycle,
            machine,
            triggers,
            clock,
            notifier,
            state_store,
            memory,
            sqlite,
            hours: self.hours,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment over one backend.
pub struct TestHarness {
    /// Ports shared by every component.
    pub ports: Ports,
    pub lifecycle: Arc<DailyFolderLifecycle>,
    pub machine: TaskStateMachine,
    pub triggers: TriggerService,
    /// Settable clock driving dates and trigger hours.
    pub clock: Arc<FixedClock>,
    /// Captures every lifecycle event.
    pub notifier: Arc<RecordingNotifier>,
    /// Trigger state, kept across [`TestHarness::restart_triggers`].
    pub state_store: Arc<MemoryStateStore>,
    /// The in-memory store, when [`Backend::Memory`] is used.
    pub memory: Option<Arc<MemoryStore>>,
    /// The SQLite store, when [`Backend::Sqlite`] is used.
    pub sqlite: Option<Arc<SqliteStore>>,
    hours: TriggerHours,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The in-memory store. Panics on a SQLite harness.
    pub fn memory(&self) -> &MemoryStore {
        self.memory
            .as_deref()
            .expect("harness was built with the SQLite backend")
    }

    /// Simulates a process restart: a fresh trigger service loads the saved
    /// state, while the data store and clock carry over.
    pub async fn restart_triggers(&mut self) -> Result<(), LeaddeskError> {
        self.triggers = TriggerService::restore(
            self.lifecycle.clone(),
            self.state_store.clone(),
            self.clock.clone(),
            self.hours,
        )
        .await?;
        Ok(())
    }

    /// Moves the clock to `hour:minute` on `date`.
    pub fn set_time(&self, date: NaiveDate, hour: u32, minute: u32) {
        self.clock.set_to(date, hour, minute);
    }

    pub fn today(&self) -> NaiveDate {
        self.ports.today()
    }
}
