// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wires the SQLite store, the system clock, and the notifiers into the
//! lifecycle components.

use std::sync::Arc;

use async_trait::async_trait;
use leaddesk_config::model::LeaddeskConfig;
use leaddesk_core::{
    Clock, LeaddeskError, NotificationEvent, Notifier, SystemClock, TracingNotifier,
};
use leaddesk_daily::{DailyFolderLifecycle, Ports, TaskStateMachine};
use leaddesk_scheduler::{JsonStateFile, TriggerHours, TriggerService};
use leaddesk_storage::SqliteStore;
use tracing::warn;

/// Delivers each event to every inner notifier in order.
struct FanOut(Vec<Arc<dyn Notifier>>);

#[async_trait]
impl Notifier for FanOut {
    async fn notify(&self, event: NotificationEvent) {
        for notifier in &self.0 {
            notifier.notify(event.clone()).await;
        }
    }
}

/// The assembled application.
pub struct App {
    pub store: Arc<SqliteStore>,
    pub lifecycle: Arc<DailyFolderLifecycle>,
    pub machine: TaskStateMachine,
    pub triggers: Arc<TriggerService>,
}

impl App {
    pub async fn open(config: &LeaddeskConfig) -> Result<Self, LeaddeskError> {
        let store = Arc::new(SqliteStore::open(config.storage.clone()).await?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let sinks: Vec<Arc<dyn Notifier>> = vec![Arc::new(TracingNotifier), store.clone()];
        let notifier = Arc::new(FanOut(sinks));

        let ports = Ports::from_backend(store.clone(), notifier, clock.clone());
        let lifecycle = Arc::new(DailyFolderLifecycle::new(ports.clone()));
        let machine = TaskStateMachine::new(ports);

        let hours = TriggerHours {
            generation: config.scheduler.generation_hour,
            closing: config.scheduler.closing_hour,
        };
        let state = Arc::new(JsonStateFile::new(&config.scheduler.state_path));
        let triggers =
            Arc::new(TriggerService::restore(lifecycle.clone(), state, clock, hours).await?);

        Ok(Self {
            store,
            lifecycle,
            machine,
            triggers,
        })
    }

    /// Checkpoints the database. Failures are logged.
    pub async fn shutdown(&self) {
        if let Err(e) = self.store.close().await {
            warn!(error = %e, "failed to checkpoint database on shutdown");
        }
    }
}
