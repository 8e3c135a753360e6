// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task state machine transitions, follow-up booking, and race handling.

use chrono::{Duration, NaiveDate};
use leaddesk_core::{
    AppointmentType, FolderCounters, LeaddeskError, NotificationEvent, TaskChangeKind,
    TaskStatus, TaskStore, Temperature,
};
use leaddesk_daily::Generated;
use leaddesk_followup::OutcomeCategory;
use leaddesk_test_utils::fixtures::new_owner;
use leaddesk_test_utils::{Backend, TestHarness};
use proptest::prelude::*;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

async fn generated(backend: Backend, owners: usize) -> (TestHarness, Generated) {
    let roster = (0..owners)
        .map(|i| new_owner(&format!("o{i}"), &format!("Owner {i}"), Some(Temperature::Warm)))
        .collect();
    let h = TestHarness::builder()
        .with_backend(backend)
        .at(monday(), 9, 0)
        .with_owners(roster)
        .build()
        .await
        .unwrap();
    let generated = h.lifecycle.generate(monday()).await.unwrap();
    h.notifier.clear();
    (h, generated)
}

#[tokio::test]
async fn start_then_resolve_books_follow_up() {
    let (h, g) = generated(Backend::Memory, 2).await;
    let id = &g.tasks[0].id;

    let started = h.machine.start(id).await.unwrap();
    assert_eq!(started.status, TaskStatus::InProgress);

    let resolution = h
        .machine
        .resolve(id, "Appuntamento fissato", Some("vuole vendere".into()))
        .await
        .unwrap();
    assert_eq!(resolution.category, OutcomeCategory::AppointmentSet);
    assert_eq!(resolution.task.status, TaskStatus::Archived);
    assert_eq!(
        resolution.task.call_outcome.as_deref(),
        Some("Appuntamento fissato")
    );
    assert_eq!(resolution.task.notes.as_deref(), Some("vuole vendere"));
    assert!(resolution.task.completed_at.is_some());

    let appointment = resolution.follow_up.expect("appointment outcome books a visit");
    assert_eq!(appointment.date, monday() + Duration::days(3));
    assert_eq!(appointment.appointment_type, AppointmentType::Visit);
    assert_eq!(appointment.owner_id, g.tasks[0].owner_id);
    assert!(appointment.whatsapp_script.as_deref().unwrap_or("").contains("Owner"));
    assert_eq!(h.memory().appointments(), vec![appointment]);

    let owner = h.ports.owners.owner(&g.tasks[0].owner_id).await.unwrap().unwrap();
    assert_eq!(owner.last_outcome.as_deref(), Some("Appuntamento fissato"));
    assert!(owner.last_contact.is_some());

    let folder = h.lifecycle.folder(monday()).await.unwrap().unwrap();
    assert_eq!(
        folder.counters(),
        FolderCounters {
            completed_calls: 1,
            successful_calls: 1,
            appointments_set: 1,
        }
    );
    assert_eq!(
        h.notifier.kinds(),
        vec!["task_changed", "follow_up_scheduled", "task_changed"]
    );
}

#[tokio::test]
async fn terminal_outcome_books_nothing() {
    let (h, g) = generated(Backend::Memory, 1).await;
    let resolution = h
        .machine
        .resolve(&g.tasks[0].id, "Venduto", None)
        .await
        .unwrap();
    assert_eq!(resolution.category, OutcomeCategory::Terminal);
    assert!(resolution.follow_up.is_none());
    assert!(h.memory().appointments().is_empty());
}

#[tokio::test]
async fn failed_follow_up_booking_leaves_task_retryable() {
    let (h, g) = generated(Backend::Memory, 1).await;
    let id = &g.tasks[0].id;
    h.machine.start(id).await.unwrap();
    h.notifier.clear();

    h.memory().set_calendar_offline(true);
    let err = h
        .machine
        .resolve(id, "Richiamare", None)
        .await
        .unwrap_err();
    assert!(matches!(err, LeaddeskError::DataAccess { .. }));

    let task = h.ports.tasks.task(id).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::InProgress);
    assert!(task.call_outcome.is_none());
    assert!(task.completed_at.is_none());
    let folder = h.lifecycle.folder(monday()).await.unwrap().unwrap();
    assert_eq!(folder.counters(), FolderCounters::default());
    assert!(h.memory().appointments().is_empty());
    let owner = h.ports.owners.owner(&task.owner_id).await.unwrap().unwrap();
    assert!(owner.last_outcome.is_none());
    assert!(owner.last_contact.is_none());
    assert!(h.notifier.events().is_empty());

    h.memory().set_calendar_offline(false);
    let resolution = h.machine.resolve(id, "Richiamare", None).await.unwrap();
    assert_eq!(resolution.task.status, TaskStatus::Archived);
    let appointment = resolution.follow_up.expect("callback books a call");
    assert_eq!(appointment.date, monday() + Duration::days(2));
    assert_eq!(h.memory().appointments(), vec![appointment]);
    let folder = h.lifecycle.folder(monday()).await.unwrap().unwrap();
    assert_eq!(folder.completed_calls, 1);
}

#[tokio::test]
async fn terminal_outcome_still_records_contact_when_calendar_is_down() {
    let (h, g) = generated(Backend::Memory, 1).await;
    h.memory().set_calendar_offline(true);
    let resolution = h
        .machine
        .resolve(&g.tasks[0].id, "Venduto", None)
        .await
        .unwrap();
    assert!(resolution.follow_up.is_none());
    let owner = h.ports.owners.owner(&g.tasks[0].owner_id).await.unwrap().unwrap();
    assert_eq!(owner.last_outcome.as_deref(), Some("Venduto"));
}

#[tokio::test]
async fn resolve_requires_an_outcome() {
    let (h, g) = generated(Backend::Memory, 1).await;
    let err = h.machine.resolve(&g.tasks[0].id, "   ", None).await.unwrap_err();
    assert!(matches!(err, LeaddeskError::InvalidTransition { .. }));
    let task = h.ports.tasks.task(&g.tasks[0].id).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
}

#[tokio::test]
async fn start_rejects_non_pending_tasks() {
    let (h, g) = generated(Backend::Memory, 1).await;
    let id = &g.tasks[0].id;
    h.machine.start(id).await.unwrap();
    assert!(matches!(
        h.machine.start(id).await,
        Err(LeaddeskError::InvalidTransition { .. })
    ));
    h.machine.archive_manual(id).await.unwrap();
    assert!(matches!(
        h.machine.start(id).await,
        Err(LeaddeskError::InvalidTransition { .. })
    ));
}

async fn archive_and_restore_round_trip(backend: Backend) {
    let (h, g) = generated(backend, 1).await;
    let id = &g.tasks[0].id;

    let archived = h.machine.archive_manual(id).await.unwrap();
    assert_eq!(archived.status, TaskStatus::Archived);
    assert!(archived.completed_at.is_some());
    assert!(archived.call_outcome.is_none());

    let restored = h.machine.restore(id).await.unwrap();
    assert_eq!(restored.status, TaskStatus::Pending);
    assert!(restored.completed_at.is_none());

    let err = h.machine.restore(id).await.unwrap_err();
    assert!(matches!(err, LeaddeskError::InvalidTransition { .. }));

    let folder = h.lifecycle.folder(monday()).await.unwrap().unwrap();
    assert_eq!(folder.counters(), FolderCounters::default());
}

#[tokio::test]
async fn archive_and_restore_round_trip_in_memory() {
    archive_and_restore_round_trip(Backend::Memory).await;
}

#[tokio::test]
async fn archive_and_restore_round_trip_in_sqlite() {
    archive_and_restore_round_trip(Backend::Sqlite).await;
}

#[tokio::test]
async fn restore_keeps_counters_and_outcome() {
    let (h, g) = generated(Backend::Memory, 1).await;
    let id = &g.tasks[0].id;
    h.machine.resolve(id, "Interessato", None).await.unwrap();
    let restored = h.machine.restore(id).await.unwrap();
    assert_eq!(restored.call_outcome.as_deref(), Some("Interessato"));

    let folder = h.lifecycle.folder(monday()).await.unwrap().unwrap();
    assert_eq!(folder.completed_calls, 1);
    assert_eq!(folder.successful_calls, 1);
}

async fn reorder_swaps_adjacent_priorities(backend: Backend) {
    let (h, g) = generated(backend, 3).await;
    let [top, middle, bottom] = [&g.tasks[0], &g.tasks[1], &g.tasks[2]];
    assert_eq!((top.priority, middle.priority, bottom.priority), (3, 2, 1));

    let (a, b) = h.machine.reorder(&top.id, &middle.id).await.unwrap();
    assert_eq!((a.priority, b.priority), (2, 3));

    let err = h.machine.reorder(&top.id, &top.id).await.unwrap_err();
    assert!(matches!(err, LeaddeskError::InvalidTransition { .. }));

    // Order is now middle, top, bottom: middle and bottom are not adjacent.
    let err = h.machine.reorder(&middle.id, &bottom.id).await.unwrap_err();
    assert!(matches!(err, LeaddeskError::InvalidTransition { .. }));

    h.machine.move_down(&top.id).await.unwrap();
    let order: Vec<String> = h
        .lifecycle
        .load(monday())
        .await
        .unwrap()
        .unwrap()
        .tasks
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(order, vec![middle.id.clone(), bottom.id.clone(), top.id.clone()]);

    let err = h.machine.move_down(&top.id).await.unwrap_err();
    assert!(matches!(err, LeaddeskError::InvalidTransition { .. }));
    let err = h.machine.move_up(&middle.id).await.unwrap_err();
    assert!(matches!(err, LeaddeskError::InvalidTransition { .. }));

    let reordered = h
        .notifier
        .events()
        .iter()
        .filter(|e| {
            matches!(
                e,
                NotificationEvent::TaskChanged {
                    change: TaskChangeKind::Reordered,
                    ..
                }
            )
        })
        .count();
    assert_eq!(reordered, 4);
}

#[tokio::test]
async fn reorder_swaps_adjacent_priorities_in_memory() {
    reorder_swaps_adjacent_priorities(Backend::Memory).await;
}

#[tokio::test]
async fn reorder_swaps_adjacent_priorities_in_sqlite() {
    reorder_swaps_adjacent_priorities(Backend::Sqlite).await;
}

#[tokio::test]
async fn reorder_skips_over_archived_tasks() {
    let (h, g) = generated(Backend::Memory, 3).await;
    h.machine.archive_manual(&g.tasks[1].id).await.unwrap();

    let (a, b) = h.machine.reorder(&g.tasks[0].id, &g.tasks[2].id).await.unwrap();
    assert_eq!((a.priority, b.priority), (1, 3));

    let err = h
        .machine
        .reorder(&g.tasks[0].id, &g.tasks[1].id)
        .await
        .unwrap_err();
    assert!(matches!(err, LeaddeskError::InvalidTransition { .. }));
}

#[tokio::test]
async fn notes_can_be_edited_in_any_state() {
    let (h, g) = generated(Backend::Memory, 1).await;
    let id = &g.tasks[0].id;
    h.machine.resolve(id, "Non risponde", None).await.unwrap();
    let task = h.machine.edit_notes(id, "richiamare la sera").await.unwrap();
    assert_eq!(task.notes.as_deref(), Some("richiamare la sera"));
    assert_eq!(task.status, TaskStatus::Archived);
}

#[tokio::test]
async fn delete_removes_task() {
    let (h, g) = generated(Backend::Sqlite, 2).await;
    let id = &g.tasks[0].id;
    h.machine.delete(id).await.unwrap();

    assert!(h.ports.tasks.task(id).await.unwrap().is_none());
    assert!(matches!(
        h.machine.delete(id).await,
        Err(LeaddeskError::NotFound { entity: "task", .. })
    ));
    assert_eq!(h.notifier.kinds(), vec!["task_deleted"]);
}

async fn resolve_and_delete_race(backend: Backend) {
    let (h, g) = generated(backend, 1).await;
    let id = g.tasks[0].id.clone();

    let (resolved, deleted) = tokio::join!(
        h.machine.resolve(&id, "Interessato", None),
        h.machine.delete(&id),
    );
    let folder = h.lifecycle.folder(monday()).await.unwrap().unwrap();
    assert!(h.ports.tasks.task(&id).await.unwrap().is_none() || deleted.is_err());

    match (resolved, deleted) {
        (Ok(_), Ok(())) => {
            // Resolve landed first, then the delete removed the row.
            assert_eq!(folder.completed_calls, 1);
        }
        (Err(LeaddeskError::NotFound { .. }), Ok(())) => {
            assert_eq!(folder.completed_calls, 0);
        }
        (Ok(_), Err(e)) => panic!("delete must not fail after resolve: {e}"),
        (Err(e), _) => panic!("unexpected resolve error: {e}"),
    }
}

#[tokio::test]
async fn resolve_and_delete_race_in_memory() {
    resolve_and_delete_race(Backend::Memory).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn resolve_and_delete_race_in_sqlite() {
    resolve_and_delete_race(Backend::Sqlite).await;
}

fn outcome_label() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "Richiamare",
        "Interessato",
        "Appuntamento fissato",
        "Non risponde",
        "Non interessato",
        "Venduto",
        "Attesa info",
        "Altro",
    ])
}

#[derive(Debug, Clone)]
enum Step {
    Start(usize),
    Resolve(usize, &'static str),
    Archive(usize),
    Restore(usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..4usize).prop_map(Step::Start),
        (0..4usize, outcome_label()).prop_map(|(i, o)| Step::Resolve(i, o)),
        (0..4usize).prop_map(Step::Archive),
        (0..4usize).prop_map(Step::Restore),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn counters_never_decrease(steps in prop::collection::vec(step(), 1..24)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let (h, g) = generated(Backend::Memory, 4).await;
            let mut last = FolderCounters::default();
            for step in steps {
                let _ = match step {
                    Step::Start(i) => h.machine.start(&g.tasks[i].id).await.map(|_| ()),
                    Step::Resolve(i, outcome) => {
                        h.machine.resolve(&g.tasks[i].id, outcome, None).await.map(|_| ())
                    }
                    Step::Archive(i) => h.machine.archive_manual(&g.tasks[i].id).await.map(|_| ()),
                    Step::Restore(i) => h.machine.restore(&g.tasks[i].id).await.map(|_| ()),
                };
                let now = h.lifecycle.folder(monday()).await.unwrap().unwrap().counters();
                assert!(now.completed_calls >= last.completed_calls);
                assert!(now.successful_calls >= last.successful_calls);
                assert!(now.appointments_set >= last.appointments_set);
                assert!(now.successful_calls <= now.completed_calls);
                last = now;
            }
        });
    }
}
