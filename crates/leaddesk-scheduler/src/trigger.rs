// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation and closing triggers.

use std::sync::Arc;

use chrono::{NaiveDate, Timelike};
use leaddesk_core::{Clock, DailyFolder, LeaddeskError, SchedulerState, TriggerStateStore};
use leaddesk_daily::{DailyFolderLifecycle, Generated};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Local hours at which the two daily triggers open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerHours {
    pub generation: u32,
    pub closing: u32,
}

impl Default for TriggerHours {
    fn default() -> Self {
        Self {
            generation: 8,
            closing: 20,
        }
    }
}

/// Why a trigger did not fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The current hour is before the trigger hour.
    BeforeHour(u32),
    /// The trigger state already records today.
    AlreadyRecorded,
    /// A folder for today exists already.
    FolderExists,
    /// No folder for today, so there is nothing to close.
    NoFolder,
    /// Today's folder is no longer active.
    FolderNotActive,
}

/// Result of one trigger check.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    Generated(Generated),
    Closed(DailyFolder),
    Skipped(SkipReason),
}

impl TriggerOutcome {
    pub fn fired(&self) -> bool {
        !matches!(self, TriggerOutcome::Skipped(_))
    }
}

/// Edge-triggered daily generation and closing.
///
/// Holds its [`SchedulerState`] explicitly and writes every change through
/// the injected store. Both checks are idempotent and safe to call as often
/// as the caller likes.
pub struct TriggerService {
    lifecycle: Arc<DailyFolderLifecycle>,
    store: Arc<dyn TriggerStateStore>,
    clock: Arc<dyn Clock>,
    hours: TriggerHours,
    state: Mutex<SchedulerState>,
}

impl TriggerService {
    pub fn new(
        lifecycle: Arc<DailyFolderLifecycle>,
        store: Arc<dyn TriggerStateStore>,
        clock: Arc<dyn Clock>,
        hours: TriggerHours,
        state: SchedulerState,
    ) -> Self {
        Self {
            lifecycle,
            store,
            clock,
            hours,
            state: Mutex::new(state),
        }
    }

    /// Builds the service with the state last saved in `store`.
    pub async fn restore(
        lifecycle: Arc<DailyFolderLifecycle>,
        store: Arc<dyn TriggerStateStore>,
        clock: Arc<dyn Clock>,
        hours: TriggerHours,
    ) -> Result<Self, LeaddeskError> {
        let state = store.load().await?;
        debug!(
            last_generated = ?state.last_generated,
            last_closed = ?state.last_closed,
            "trigger state restored"
        );
        Ok(Self::new(lifecycle, store, clock, hours, state))
    }

    pub async fn state(&self) -> SchedulerState {
        *self.state.lock().await
    }

    /// Generates today's folder once the generation hour is reached.
    pub async fn check_generate(&self) -> Result<TriggerOutcome, LeaddeskError> {
        let now = self.clock.now();
        if now.hour() < self.hours.generation {
            return Ok(TriggerOutcome::Skipped(SkipReason::BeforeHour(
                self.hours.generation,
            )));
        }
        self.generate_on(now.date_naive(), false).await
    }

    /// Closes today's folder once the closing hour is reached.
    pub async fn check_close(&self) -> Result<TriggerOutcome, LeaddeskError> {
        let now = self.clock.now();
        if now.hour() < self.hours.closing {
            return Ok(TriggerOutcome::Skipped(SkipReason::BeforeHour(
                self.hours.closing,
            )));
        }
        self.close_on(now.date_naive(), false).await
    }

    /// Operator override: generates now regardless of the hour.
    ///
    /// With `force`, the recorded "generated today" guard is ignored too. The
    /// one-folder-per-date rule still holds.
    pub async fn generate_now(&self, force: bool) -> Result<TriggerOutcome, LeaddeskError> {
        let today = self.clock.now().date_naive();
        self.generate_on(today, force).await
    }

    /// Operator override: closes now regardless of the hour.
    pub async fn close_now(&self, force: bool) -> Result<TriggerOutcome, LeaddeskError> {
        let today = self.clock.now().date_naive();
        self.close_on(today, force).await
    }

    /// Runs both checks, logging failures. The next tick is the retry.
    pub async fn tick(&self) {
        match self.check_generate().await {
            Ok(outcome) if outcome.fired() => info!("generation trigger fired"),
            Ok(outcome) => debug!(?outcome, "generation trigger skipped"),
            Err(e) => error!(error = %e, "generation trigger failed, retrying next tick"),
        }
        match self.check_close().await {
            Ok(outcome) if outcome.fired() => info!("closing trigger fired"),
            Ok(outcome) => debug!(?outcome, "closing trigger skipped"),
            Err(e) => error!(error = %e, "closing trigger failed, retrying next tick"),
        }
    }

    async fn generate_on(
        &self,
        today: NaiveDate,
        force: bool,
    ) -> Result<TriggerOutcome, LeaddeskError> {
        let mut state = self.state.lock().await;
        if !force && state.generated_on(today) {
            return Ok(TriggerOutcome::Skipped(SkipReason::AlreadyRecorded));
        }
        if self.lifecycle.folder(today).await?.is_some() {
            self.record(&mut state, |s| s.last_generated = Some(today)).await;
            return Ok(TriggerOutcome::Skipped(SkipReason::FolderExists));
        }

        match self.lifecycle.generate(today).await {
            Ok(generated) => {
                self.record(&mut state, |s| s.last_generated = Some(today)).await;
                Ok(TriggerOutcome::Generated(generated))
            }
            Err(e) if e.is_idempotency_guard() => {
                debug!(%today, "folder generated concurrently elsewhere");
                self.record(&mut state, |s| s.last_generated = Some(today)).await;
                Ok(TriggerOutcome::Skipped(SkipReason::FolderExists))
            }
            Err(e) => Err(e),
        }
    }

    async fn close_on(
        &self,
        today: NaiveDate,
        force: bool,
    ) -> Result<TriggerOutcome, LeaddeskError> {
        let mut state = self.state.lock().await;
        if !force && state.closed_on(today) {
            return Ok(TriggerOutcome::Skipped(SkipReason::AlreadyRecorded));
        }
        let Some(folder) = self.lifecycle.folder(today).await? else {
            return Ok(TriggerOutcome::Skipped(SkipReason::NoFolder));
        };
        if !folder.is_active() {
            self.record(&mut state, |s| s.last_closed = Some(today)).await;
            return Ok(TriggerOutcome::Skipped(SkipReason::FolderNotActive));
        }

        match self.lifecycle.close(today).await {
            Ok(closed) => {
                self.record(&mut state, |s| s.last_closed = Some(today)).await;
                Ok(TriggerOutcome::Closed(closed))
            }
            Err(e) if e.is_idempotency_guard() => {
                debug!(%today, "folder closed concurrently elsewhere");
                self.record(&mut state, |s| s.last_closed = Some(today)).await;
                Ok(TriggerOutcome::Skipped(SkipReason::FolderNotActive))
            }
            Err(e) => Err(e),
        }
    }

    /// Applies `update` and persists the state. A failed save is logged; the
    /// folder checks keep the triggers idempotent until the next save lands.
    async fn record(&self, state: &mut SchedulerState, update: impl FnOnce(&mut SchedulerState)) {
        update(state);
        if let Err(e) = self.store.save(state).await {
            warn!(error = %e, "failed to persist trigger state");
        }
    }
}
