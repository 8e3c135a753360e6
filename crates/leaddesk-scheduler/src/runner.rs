// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic timer driving the triggers.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::trigger::TriggerService;

/// Ticks `service` every `interval` until `cancel` fires.
///
/// The first tick runs immediately, so a process started after 08:00
/// generates without waiting a full interval.
pub async fn run_triggers(
    service: Arc<TriggerService>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(interval_secs = interval.as_secs(), "trigger loop started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("trigger loop stopping");
                break;
            }
            _ = ticker.tick() => {
                service.tick().await;
            }
        }
    }
}
