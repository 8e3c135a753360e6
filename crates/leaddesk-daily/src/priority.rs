// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Candidate selection and priority assignment for a day's worklist.
//!
//! Pure: given the roster and the day's appointments, returns the ordered
//! plan. Each owner contributes at most one task, chosen as
//! follow_up over callback over new_contact.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use leaddesk_core::{Appointment, Owner, TaskType, Temperature};

/// One planned task, before it is bound to a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTask {
    pub owner_id: String,
    pub task_type: TaskType,
    pub priority: i64,
    pub scheduled_time: Option<NaiveTime>,
}

/// The ordered plan for one date. Index 0 is called first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub tasks: Vec<PlannedTask>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of new-contact tasks.
    pub fn new_contacts(&self) -> u32 {
        self.count(|t| t == TaskType::NewContact)
    }

    /// Number of follow-up and callback tasks.
    pub fn followups(&self) -> u32 {
        self.count(|t| t != TaskType::NewContact)
    }

    fn count(&self, pred: impl Fn(TaskType) -> bool) -> u32 {
        self.tasks.iter().filter(|t| pred(t.task_type)).count() as u32
    }
}

struct Candidate<'a> {
    owner: &'a Owner,
    task_type: TaskType,
    scheduled_time: Option<NaiveTime>,
}

/// Earliest appointment time per owner among appointments dated `date`.
/// An untimed appointment sorts after timed ones.
fn due_follow_ups(
    date: NaiveDate,
    appointments: &[Appointment],
) -> HashMap<&str, Option<NaiveTime>> {
    let mut due: HashMap<&str, Option<NaiveTime>> = HashMap::new();
    for appt in appointments.iter().filter(|a| a.date == date) {
        due.entry(appt.owner_id.as_str())
            .and_modify(|t| {
                *t = match (*t, appt.time) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                }
            })
            .or_insert(appt.time);
    }
    due
}

fn classify<'a>(
    owner: &'a Owner,
    date: NaiveDate,
    due: &HashMap<&str, Option<NaiveTime>>,
) -> Option<Candidate<'a>> {
    if let Some(time) = due.get(owner.id.as_str()) {
        return Some(Candidate {
            owner,
            task_type: TaskType::FollowUp,
            scheduled_time: *time,
        });
    }
    if leaddesk_followup::retry_date(owner) == Some(date) {
        return Some(Candidate {
            owner,
            task_type: TaskType::Callback,
            scheduled_time: None,
        });
    }
    if owner.is_uncontacted() {
        return Some(Candidate {
            owner,
            task_type: TaskType::NewContact,
            scheduled_time: None,
        });
    }
    None
}

/// Builds the plan for `date`.
///
/// Ordering is task type, then temperature, then roster order (stable).
/// Priorities run from `n` down to `1`, so they are unique by construction.
pub fn plan_tasks(date: NaiveDate, owners: &[Owner], appointments: &[Appointment]) -> Plan {
    let due = due_follow_ups(date, appointments);
    let mut candidates: Vec<Candidate<'_>> = owners
        .iter()
        .filter_map(|owner| classify(owner, date, &due))
        .collect();

    candidates.sort_by_key(|c| {
        (
            Reverse(c.task_type.rank()),
            Reverse(Temperature::rank(c.owner.temperature)),
        )
    });

    let n = candidates.len() as i64;
    let tasks = candidates
        .into_iter()
        .enumerate()
        .map(|(index, c)| PlannedTask {
            owner_id: c.owner.id.clone(),
            task_type: c.task_type,
            priority: n - index as i64,
            scheduled_time: c.scheduled_time,
        })
        .collect();
    Plan { tasks }
}
