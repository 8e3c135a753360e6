// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcome category to follow-up policy table.

use leaddesk_core::AppointmentType;

use crate::outcome::OutcomeCategory;

/// Which script template pair a follow-up uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKey {
    CallBack,
    Interested,
    Appointment,
    NoAnswer,
    NotInterested,
    Generic,
}

/// When and how to get back to an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUpPolicy {
    pub days_offset: i64,
    pub appointment_type: AppointmentType,
    pub script: ScriptKey,
}

impl FollowUpPolicy {
    const fn call(days_offset: i64, script: ScriptKey) -> Self {
        Self {
            days_offset,
            appointment_type: AppointmentType::Call,
            script,
        }
    }
}

/// Follow-up policy for an outcome category. `None` means the lead is closed.
pub fn policy_for(category: OutcomeCategory) -> Option<FollowUpPolicy> {
    let policy = match category {
        OutcomeCategory::CallBack => FollowUpPolicy::call(2, ScriptKey::CallBack),
        OutcomeCategory::Interested => FollowUpPolicy::call(1, ScriptKey::Interested),
        OutcomeCategory::AppointmentSet => FollowUpPolicy {
            days_offset: 3,
            appointment_type: AppointmentType::Visit,
            script: ScriptKey::Appointment,
        },
        OutcomeCategory::NoAnswer => FollowUpPolicy::call(1, ScriptKey::NoAnswer),
        OutcomeCategory::NotInterested => FollowUpPolicy::call(30, ScriptKey::NotInterested),
        OutcomeCategory::Terminal => return None,
        OutcomeCategory::AwaitingInfo | OutcomeCategory::Other => {
            FollowUpPolicy::call(7, ScriptKey::Generic)
        }
    };
    Some(policy)
}
