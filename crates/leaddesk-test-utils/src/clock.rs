// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settable clock.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use leaddesk_core::Clock;

/// Clock that returns whatever local time it was last set to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Local>>,
}

/// Local wall time `hour:minute` on `date`. Picks the earliest instant when
/// a DST change makes the wall time ambiguous.
pub fn local_time(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Local> {
    let naive = date
        .and_hms_opt(hour, minute, 0)
        .expect("hour and minute must be valid");
    Local
        .from_local_datetime(&naive)
        .earliest()
        .expect("wall time must exist in the local timezone")
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
        Self::new(local_time(date, hour, minute))
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock().expect("clock lock poisoned") = now;
    }

    /// Moves the clock to `hour:minute` on `date`.
    pub fn set_to(&self, date: NaiveDate, hour: u32, minute: u32) {
        self.set(local_time(date, hour, minute));
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().expect("clock lock poisoned")
    }
}
