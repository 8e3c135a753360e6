// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Follow-up derivation for Leaddesk.
//!
//! Maps a call outcome to a follow-up appointment (type and due date) and to
//! a pair of contact scripts. Everything in this crate is pure: nothing is
//! persisted, and no function fails.

pub mod outcome;
pub mod policy;
pub mod scripts;

use chrono::{DateTime, Days, NaiveDate, Utc};
use leaddesk_core::{Appointment, AppointmentType, Owner};
use serde::{Deserialize, Serialize};

pub use outcome::OutcomeCategory;
pub use policy::{FollowUpPolicy, ScriptKey, policy_for};
pub use scripts::Scripts;

/// A derived follow-up, ready to be booked on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub category: OutcomeCategory,
    pub appointment_type: AppointmentType,
    pub date: NaiveDate,
    pub title: String,
    pub scripts: Scripts,
}

impl FollowUp {
    /// Materializes this follow-up as a calendar appointment for `owner_id`.
    pub fn to_appointment(&self, owner_id: &str, created_at: DateTime<Utc>) -> Appointment {
        Appointment {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            date: self.date,
            time: None,
            appointment_type: self.appointment_type,
            title: self.title.clone(),
            whatsapp_script: Some(self.scripts.whatsapp.clone()),
            voice_script: Some(self.scripts.voice.clone()),
            created_at,
        }
    }
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    u64::try_from(days)
        .ok()
        .and_then(|d| date.checked_add_days(Days::new(d)))
        .unwrap_or(date)
}

/// Derives the follow-up for `outcome`, anchored on `today`.
///
/// Returns `None` for terminal outcomes (sold, deceased, wrong number).
pub fn derive_follow_up(outcome: &str, owner: &Owner, today: NaiveDate) -> Option<FollowUp> {
    let category = OutcomeCategory::classify(outcome);
    let policy = policy_for(category)?;
    Some(FollowUp {
        category,
        appointment_type: policy.appointment_type,
        date: add_days(today, policy.days_offset),
        title: scripts::title(policy.script, owner),
        scripts: scripts::render(policy.script, owner),
    })
}

/// The date an owner is due for a callback, if their last outcome asks for one.
///
/// Uses the same offsets as [`derive_follow_up`], anchored on the calendar
/// date (UTC) of the owner's last contact.
pub fn retry_date(owner: &Owner) -> Option<NaiveDate> {
    let outcome = owner.last_outcome.as_deref()?;
    let contacted = owner.last_contact?;
    let category = OutcomeCategory::classify(outcome);
    if !category.is_retry() {
        return None;
    }
    let policy = policy_for(category)?;
    Some(add_days(contacted.date_naive(), policy.days_offset))
}
