// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for owners and appointments used across test suites.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use leaddesk_core::{Appointment, AppointmentType, Owner, Temperature};

/// An owner that was never contacted.
pub fn new_owner(id: &str, name: &str, temperature: Option<Temperature>) -> Owner {
    Owner {
        id: id.to_string(),
        name: name.to_string(),
        address: Some(format!("Via {id} 1, Milano")),
        phone: None,
        temperature,
        last_outcome: None,
        last_contact: None,
    }
}

/// An owner whose last call ended with `outcome` at `last_contact`.
pub fn contacted_owner(
    id: &str,
    name: &str,
    temperature: Option<Temperature>,
    outcome: &str,
    last_contact: DateTime<Utc>,
) -> Owner {
    Owner {
        last_outcome: Some(outcome.to_string()),
        last_contact: Some(last_contact),
        ..new_owner(id, name, temperature)
    }
}

/// Noon UTC on `date`.
pub fn noon_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)) + chrono::Duration::hours(12)
}

/// A follow-up call appointment for `owner_id` on `date`.
pub fn call_appointment(owner_id: &str, date: NaiveDate, time: Option<NaiveTime>) -> Appointment {
    Appointment {
        id: format!("appt-{owner_id}-{date}"),
        owner_id: owner_id.to_string(),
        date,
        time,
        appointment_type: AppointmentType::Call,
        title: "Richiamata".to_string(),
        whatsapp_script: None,
        voice_script: None,
        created_at: noon_utc(date - chrono::Duration::days(1)),
    }
}
