// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The collaborator set every lifecycle component is built from.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use leaddesk_core::{
    AppointmentBook, Clock, FolderStore, Notifier, OwnerDirectory, TaskStore,
};

/// Shared handles to the data store, the clock, and the notifier.
#[derive(Clone)]
pub struct Ports {
    pub folders: Arc<dyn FolderStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub owners: Arc<dyn OwnerDirectory>,
    pub calendar: Arc<dyn AppointmentBook>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
}

impl Ports {
    /// Wires every data-store port to one backend.
    pub fn from_backend<B>(
        backend: Arc<B>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        B: FolderStore + TaskStore + OwnerDirectory + AppointmentBook + 'static,
    {
        Self {
            folders: backend.clone(),
            tasks: backend.clone(),
            owners: backend.clone(),
            calendar: backend,
            notifier,
            clock,
        }
    }

    /// Current local calendar date.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    /// Current instant, for persisted timestamps.
    pub fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now().with_timezone(&Utc)
    }
}
