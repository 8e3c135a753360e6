// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment calendar port, owned by the calendar subsystem.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::LeaddeskError;
use crate::types::Appointment;

#[async_trait]
pub trait AppointmentBook: Send + Sync {
    /// Appointments dated on `date`. This is the sole source of truth for
    /// "follow-up due today".
    async fn appointments_on(&self, date: NaiveDate) -> Result<Vec<Appointment>, LeaddeskError>;

    async fn insert_appointment(&self, appointment: &Appointment) -> Result<(), LeaddeskError>;
}
