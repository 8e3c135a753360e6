// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wall-clock port.

use chrono::{DateTime, Local};

/// Source of the current local wall-clock time.
///
/// Trigger hours and folder dates are evaluated in local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The process clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
