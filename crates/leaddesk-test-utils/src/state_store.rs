// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory trigger state.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use leaddesk_core::{LeaddeskError, SchedulerState, TriggerStateStore};

/// Keeps the saved state in memory so it survives a rebuilt trigger service.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<SchedulerState>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SchedulerState) -> Self {
        Self {
            state: Mutex::new(state),
            ..Self::default()
        }
    }

    /// The last successfully saved state.
    pub fn saved(&self) -> SchedulerState {
        *self.state.lock().expect("state lock poisoned")
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Makes every following save fail until switched off again.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl TriggerStateStore for MemoryStateStore {
    async fn load(&self) -> Result<SchedulerState, LeaddeskError> {
        Ok(self.saved())
    }

    async fn save(&self, state: &SchedulerState) -> Result<(), LeaddeskError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(LeaddeskError::Internal("state store unavailable".into()));
        }
        *self.state.lock().expect("state lock poisoned") = *state;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
