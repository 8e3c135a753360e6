// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound notification port.

use async_trait::async_trait;
use tracing::info;

use crate::types::NotificationEvent;

/// Fire-and-forget sink for change events.
///
/// Implementations must not fail the caller: delivery problems are logged
/// and dropped.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: NotificationEvent);
}

/// Notifier that only writes events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, event: NotificationEvent) {
        match &event {
            NotificationEvent::FollowUpScheduled {
                appointment,
                owner_name,
            } => info!(
                owner = %owner_name,
                date = %appointment.date,
                kind = %appointment.appointment_type,
                "follow-up scheduled"
            ),
            other => info!(kind = other.kind(), "lifecycle event"),
        }
    }
}
