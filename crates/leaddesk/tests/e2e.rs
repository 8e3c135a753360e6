// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for a full working day.
//!
//! Each test creates an isolated TestHarness with a fixed clock and drives
//! the triggers and the state machine the way `leaddesk serve` and the task
//! subcommands do. Tests are independent and order-insensitive.

use chrono::{Duration, NaiveDate};
use leaddesk_core::{
    AppointmentType, FolderStatus, LeaddeskError, TaskStatus, TaskType, Temperature,
};
use leaddesk_followup::OutcomeCategory;
use leaddesk_scheduler::TriggerOutcome;
use leaddesk_test_utils::fixtures::new_owner;
use leaddesk_test_utils::{Backend, TestHarness};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

/// Ten never-contacted owners; Marco Rossi is the only hot lead.
fn roster() -> Vec<leaddesk_core::Owner> {
    let mut owners = vec![new_owner("marco", "Marco Rossi", Some(Temperature::Hot))];
    owners.extend(
        (1..10).map(|i| {
            new_owner(&format!("o{i}"), &format!("Owner {i}"), Some(Temperature::Cold))
        }),
    );
    owners
}

async fn harness(backend: Backend) -> TestHarness {
    TestHarness::builder()
        .with_backend(backend)
        .with_owners(roster())
        .at(day(), 7, 30)
        .build()
        .await
        .unwrap()
}

// ---- Scenario A: morning generation ----

async fn morning_generation(backend: Backend) {
    let h = harness(backend).await;
    assert!(!h.triggers.check_generate().await.unwrap().fired());
    assert!(h.lifecycle.folder(day()).await.unwrap().is_none());

    h.set_time(day(), 8, 0);
    let TriggerOutcome::Generated(generated) = h.triggers.check_generate().await.unwrap() else {
        panic!("generation should fire at 08:00");
    };
    assert_eq!(generated.folder.date, day());
    assert_eq!(generated.folder.status, FolderStatus::Active);
    assert_eq!(generated.folder.total_contacts, 10);
    assert_eq!(generated.folder.total_followups, 0);
    assert!(
        generated
            .tasks
            .iter()
            .all(|t| t.task_type == TaskType::NewContact)
    );
}

#[tokio::test]
async fn scenario_a_morning_generation_in_memory() {
    morning_generation(Backend::Memory).await;
}

#[tokio::test]
async fn scenario_a_morning_generation_in_sqlite() {
    morning_generation(Backend::Sqlite).await;
}

// ---- Scenario B: a call asks to be called back ----

async fn callback_books_appointment(backend: Backend) {
    let h = harness(backend).await;
    h.set_time(day(), 9, 15);
    h.triggers.check_generate().await.unwrap();

    let view = h.lifecycle.load_today().await.unwrap().unwrap();
    let t1 = view.tasks[0].clone();
    assert_eq!(t1.owner_id, "marco");
    assert_eq!(t1.priority, 10);

    h.machine.start(&t1.id).await.unwrap();
    let resolution = h.machine.resolve(&t1.id, "Richiamare", None).await.unwrap();
    assert_eq!(resolution.category, OutcomeCategory::CallBack);
    assert_eq!(resolution.task.status, TaskStatus::Archived);

    let folder = h.lifecycle.folder(day()).await.unwrap().unwrap();
    assert_eq!(folder.completed_calls, 1);
    assert_eq!(folder.successful_calls, 0);

    let appointment = resolution.follow_up.unwrap();
    assert_eq!(appointment.owner_id, "marco");
    assert_eq!(appointment.date, day() + Duration::days(2));
    assert_eq!(appointment.appointment_type, AppointmentType::Call);
    let whatsapp = appointment.whatsapp_script.clone().unwrap();
    let voice = appointment.voice_script.clone().unwrap();
    assert!(whatsapp.contains("Marco"));
    assert!(voice.contains("Marco"));

    let booked = h
        .ports
        .calendar
        .appointments_on(day() + Duration::days(2))
        .await
        .unwrap();
    assert_eq!(booked, vec![appointment]);

    // Two days later Marco comes back as a timed follow-up, first in line.
    h.set_time(day() + Duration::days(2), 8, 0);
    let TriggerOutcome::Generated(later) = h.triggers.check_generate().await.unwrap() else {
        panic!("generation should fire on the new day");
    };
    assert_eq!(later.tasks[0].owner_id, "marco");
    assert_eq!(later.tasks[0].task_type, TaskType::FollowUp);
    assert_eq!(later.folder.total_followups, 1);
}

#[tokio::test]
async fn scenario_b_callback_books_appointment_in_memory() {
    callback_books_appointment(Backend::Memory).await;
}

#[tokio::test]
async fn scenario_b_callback_books_appointment_in_sqlite() {
    callback_books_appointment(Backend::Sqlite).await;
}

// ---- Scenario C: evening close ----

async fn evening_close(backend: Backend) {
    let h = harness(backend).await;
    h.set_time(day(), 8, 0);
    h.triggers.check_generate().await.unwrap();

    let tasks = h.lifecycle.load_today().await.unwrap().unwrap().tasks;
    assert_eq!(tasks.len(), 10);
    for task in &tasks[..8] {
        h.machine.resolve(&task.id, "Non risponde", None).await.unwrap();
    }

    h.set_time(day(), 20, 0);
    let TriggerOutcome::Closed(closed) = h.triggers.check_close().await.unwrap() else {
        panic!("closing should fire at 20:00");
    };
    assert_eq!(closed.status, FolderStatus::Completed);
    assert_eq!(closed.closed_at, Some(h.ports.now_utc()));
    assert_eq!(closed.completed_calls, 8);

    let pending: Vec<_> = h
        .lifecycle
        .load_today()
        .await
        .unwrap()
        .unwrap()
        .tasks
        .into_iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .collect();
    assert_eq!(pending.len(), 2);

    let err = h.machine.start(&pending[0].id).await.unwrap_err();
    assert!(matches!(err, LeaddeskError::InvalidTransition { .. }));
    assert_eq!(h.notifier.kinds().last(), Some(&"folder_closed"));
}

#[tokio::test]
async fn scenario_c_evening_close_in_memory() {
    evening_close(Backend::Memory).await;
}

#[tokio::test]
async fn scenario_c_evening_close_in_sqlite() {
    evening_close(Backend::Sqlite).await;
}
