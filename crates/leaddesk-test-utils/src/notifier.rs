// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier that records events for later assertions.

use std::sync::Mutex;

use async_trait::async_trait;
use leaddesk_core::{NotificationEvent, Notifier};

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().expect("notifier lock poisoned").clone()
    }

    /// Event kinds in emission order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .expect("notifier lock poisoned")
            .iter()
            .map(NotificationEvent::kind)
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().expect("notifier lock poisoned").clear();
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: NotificationEvent) {
        self.events
            .lock()
            .expect("notifier lock poisoned")
            .push(event);
    }
}
