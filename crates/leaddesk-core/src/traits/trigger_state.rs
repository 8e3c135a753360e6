// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable local key-value port for the scheduler's trigger state.

use async_trait::async_trait;

use crate::error::LeaddeskError;
use crate::types::SchedulerState;

/// Persists [`SchedulerState`] across process restarts.
///
/// This is client-local state and never part of the shared backend schema.
#[async_trait]
pub trait TriggerStateStore: Send + Sync {
    /// Returns the stored state, or the default when nothing was saved yet.
    async fn load(&self) -> Result<SchedulerState, LeaddeskError>;

    async fn save(&self, state: &SchedulerState) -> Result<(), LeaddeskError>;
}
