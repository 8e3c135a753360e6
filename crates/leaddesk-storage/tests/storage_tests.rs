// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the SQLite store against a real database file.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use leaddesk_config::model::StorageConfig;
use leaddesk_core::{
    Appointment, AppointmentBook, AppointmentType, CallRecord, CounterDelta, DailyFolder,
    DailyTaskItem, FolderStatus, FolderStore, LeaddeskError, Owner, OwnerDirectory, PriorityClaim,
    Stamp, TaskChange, TaskStatus, TaskStore, TaskType, Temperature, WriteOutcome,
};
use leaddesk_storage::SqliteStore;
use tempfile::TempDir;

async fn open_store() -> (SqliteStore, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaddesk.db");
    let store = SqliteStore::open(StorageConfig {
        database_path: path.to_str().unwrap().to_string(),
        wal_mode: true,
    })
    .await
    .unwrap();
    (store, dir)
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn folder_with_tasks(n: i64) -> (DailyFolder, Vec<DailyTaskItem>) {
    let started = Utc.with_ymd_and_hms(2024, 3, 4, 7, 0, 0).unwrap();
    let folder = DailyFolder::open(day(), started, u32::try_from(n).unwrap(), 0);
    let tasks = (0..n)
        .map(|i| {
            DailyTaskItem::new(
                &folder.id,
                &format!("owner-{i}"),
                TaskType::NewContact,
                n - i,
                None,
            )
        })
        .collect();
    (folder, tasks)
}

fn complete_change() -> TaskChange {
    TaskChange::to(TaskStatus::Completed)
        .with_outcome("interessato")
        .stamped(Stamp::Set(Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()))
}

#[tokio::test]
async fn generation_persists_folder_and_items() {
    let (store, _dir) = open_store().await;
    let (folder, tasks) = folder_with_tasks(3);
    store.insert_generation(&folder, &tasks).await.unwrap();

    let loaded = store.folder_by_date(day()).await.unwrap().unwrap();
    assert_eq!(loaded, folder);
    assert_eq!(store.count_tasks(&folder.id).await.unwrap(), 3);

    let listed = store.tasks_for_folder(&folder.id).await.unwrap();
    let priorities: Vec<i64> = listed.iter().map(|t| t.priority).collect();
    assert_eq!(priorities, vec![3, 2, 1]);
}

#[tokio::test]
async fn second_generation_for_same_date_writes_nothing() {
    let (store, _dir) = open_store().await;
    let (first, first_tasks) = folder_with_tasks(2);
    store.insert_generation(&first, &first_tasks).await.unwrap();

    let (second, second_tasks) = folder_with_tasks(5);
    let err = store
        .insert_generation(&second, &second_tasks)
        .await
        .unwrap_err();
    assert!(matches!(err, LeaddeskError::AlreadyGenerated { date } if date == day()));
    assert!(store.folder_by_id(&second.id).await.unwrap().is_none());
    assert_eq!(store.count_tasks(&second.id).await.unwrap(), 0);
}

#[tokio::test]
async fn failed_item_insert_rolls_back_folder() {
    let (store, _dir) = open_store().await;
    let (folder, mut tasks) = folder_with_tasks(2);
    // Same owner twice violates the per-folder uniqueness constraint.
    tasks[1].owner_id = tasks[0].owner_id.clone();

    assert!(store.insert_generation(&folder, &tasks).await.is_err());
    assert!(store.folder_by_date(day()).await.unwrap().is_none());
}

#[tokio::test]
async fn apply_change_updates_task_and_counters_together() {
    let (store, _dir) = open_store().await;
    let (folder, tasks) = folder_with_tasks(1);
    store.insert_generation(&folder, &tasks).await.unwrap();

    let delta = CounterDelta {
        completed_calls: 1,
        successful_calls: 1,
        appointments_set: 0,
    };
    let outcome = store
        .apply_change(&tasks[0].id, &[TaskStatus::Pending], &complete_change(), delta)
        .await
        .unwrap();
    let WriteOutcome::Applied(task) = outcome else {
        panic!("expected applied, got {outcome:?}");
    };
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.call_outcome.as_deref(), Some("interessato"));
    assert!(task.completed_at.is_some());

    let folder = store.folder_by_id(&folder.id).await.unwrap().unwrap();
    assert_eq!(folder.completed_calls, 1);
    assert_eq!(folder.successful_calls, 1);
    assert_eq!(folder.appointments_set, 0);
}

#[tokio::test]
async fn apply_change_reports_status_mismatch() {
    let (store, _dir) = open_store().await;
    let (folder, tasks) = folder_with_tasks(1);
    store.insert_generation(&folder, &tasks).await.unwrap();

    let outcome = store
        .apply_change(
            &tasks[0].id,
            &[TaskStatus::Archived],
            &TaskChange::to(TaskStatus::Pending),
            CounterDelta::default(),
        )
        .await
        .unwrap();
    assert_eq!(outcome, WriteOutcome::StatusMismatch(TaskStatus::Pending));
}

#[tokio::test]
async fn restore_clears_completion_stamp() {
    let (store, _dir) = open_store().await;
    let (folder, tasks) = folder_with_tasks(1);
    store.insert_generation(&folder, &tasks).await.unwrap();
    store
        .apply_change(
            &tasks[0].id,
            &[TaskStatus::Pending],
            &complete_change(),
            CounterDelta::default(),
        )
        .await
        .unwrap();

    let outcome = store
        .apply_change(
            &tasks[0].id,
            &[TaskStatus::Completed],
            &TaskChange::to(TaskStatus::Pending).stamped(Stamp::Clear),
            CounterDelta::default(),
        )
        .await
        .unwrap();
    let WriteOutcome::Applied(task) = outcome else {
        panic!("expected applied, got {outcome:?}");
    };
    assert_eq!(task.status, TaskStatus::Pending);
    assert!(task.completed_at.is_none());
    assert_eq!(task.call_outcome.as_deref(), Some("interessato"));
}

#[tokio::test]
async fn writes_after_close_are_rejected() {
    let (store, _dir) = open_store().await;
    let (folder, tasks) = folder_with_tasks(2);
    store.insert_generation(&folder, &tasks).await.unwrap();

    let closed_at = Utc.with_ymd_and_hms(2024, 3, 4, 19, 0, 0).unwrap();
    let WriteOutcome::Applied(closed) = store.close_folder(&folder.id, closed_at).await.unwrap()
    else {
        panic!("close should apply");
    };
    assert_eq!(closed.status, FolderStatus::Completed);
    assert_eq!(closed.closed_at, Some(closed_at));

    let again = store.close_folder(&folder.id, closed_at).await.unwrap();
    assert_eq!(again, WriteOutcome::FolderInactive(FolderStatus::Completed));

    let change = store
        .apply_change(
            &tasks[0].id,
            &[TaskStatus::Pending],
            &complete_change(),
            CounterDelta::default(),
        )
        .await
        .unwrap();
    assert_eq!(change, WriteOutcome::FolderInactive(FolderStatus::Completed));
    assert_eq!(
        store.set_notes(&tasks[0].id, "late").await.unwrap(),
        WriteOutcome::FolderInactive(FolderStatus::Completed)
    );
    assert_eq!(
        store.delete_task(&tasks[1].id).await.unwrap(),
        WriteOutcome::FolderInactive(FolderStatus::Completed)
    );
}

#[tokio::test]
async fn resolve_after_delete_finds_nothing() {
    let (store, _dir) = open_store().await;
    let (folder, tasks) = folder_with_tasks(1);
    store.insert_generation(&folder, &tasks).await.unwrap();

    assert_eq!(
        store.delete_task(&tasks[0].id).await.unwrap(),
        WriteOutcome::Applied(())
    );
    let outcome = store
        .apply_change(
            &tasks[0].id,
            &[TaskStatus::Pending, TaskStatus::InProgress],
            &complete_change(),
            CounterDelta {
                completed_calls: 1,
                ..CounterDelta::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome, WriteOutcome::Missing);

    let folder = store.folder_by_id(&folder.id).await.unwrap().unwrap();
    assert_eq!(folder.completed_calls, 0);
}

#[tokio::test]
async fn swap_priorities_detects_stale_claims() {
    let (store, _dir) = open_store().await;
    let (folder, tasks) = folder_with_tasks(2);
    store.insert_generation(&folder, &tasks).await.unwrap();

    let a = PriorityClaim {
        task_id: tasks[0].id.clone(),
        priority: 2,
    };
    let b = PriorityClaim {
        task_id: tasks[1].id.clone(),
        priority: 1,
    };
    let WriteOutcome::Applied((a_new, b_new)) = store.swap_priorities(&a, &b).await.unwrap()
    else {
        panic!("swap should apply");
    };
    assert_eq!(a_new.priority, 1);
    assert_eq!(b_new.priority, 2);

    // The same claims no longer hold.
    assert_eq!(
        store.swap_priorities(&a, &b).await.unwrap(),
        WriteOutcome::Stale
    );
}

#[tokio::test]
async fn owners_keep_listing_order_and_record_contact() {
    let (store, _dir) = open_store().await;
    for (id, name) in [("o2", "Bruno Verdi"), ("o1", "Anna Rossi")] {
        store
            .upsert_owner(&Owner {
                id: id.into(),
                name: name.into(),
                address: None,
                phone: None,
                temperature: Some(Temperature::Warm),
                last_outcome: None,
                last_contact: None,
            })
            .await
            .unwrap();
    }
    let ids: Vec<String> = store
        .list_owners()
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(ids, vec!["o2", "o1"]);

    let at = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
    assert!(store.record_contact("o1", "richiamare", at).await.unwrap());
    assert!(!store.record_contact("ghost", "richiamare", at).await.unwrap());

    let owner = store.owner("o1").await.unwrap().unwrap();
    assert_eq!(owner.last_outcome.as_deref(), Some("richiamare"));
    assert_eq!(owner.last_contact, Some(at));
    assert_eq!(owner.temperature, Some(Temperature::Warm));
}

#[tokio::test]
async fn appointments_are_found_by_date_and_owner() {
    let (store, _dir) = open_store().await;
    let appt = Appointment {
        id: "a1".into(),
        owner_id: "o1".into(),
        date: day(),
        time: NaiveTime::from_hms_opt(15, 30, 0),
        appointment_type: AppointmentType::Visit,
        title: "Visita".into(),
        whatsapp_script: Some("Ciao".into()),
        voice_script: None,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    };
    store.insert_appointment(&appt).await.unwrap();

    assert_eq!(store.appointments_on(day()).await.unwrap(), vec![appt.clone()]);
    assert!(
        store
            .appointments_on(day().succ_opt().unwrap())
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(store.appointments_for_owner("o1").await.unwrap(), vec![appt]);
}

#[tokio::test]
async fn recent_folders_are_newest_first() {
    let (store, _dir) = open_store().await;
    let started = Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap();
    for offset in 0..3 {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1 + offset).unwrap();
        store
            .insert_generation(&DailyFolder::open(date, started, 0, 0), &[])
            .await
            .unwrap();
    }
    let dates: Vec<u32> = store
        .recent_folders(2)
        .await
        .unwrap()
        .iter()
        .map(|f| chrono::Datelike::day(&f.date))
        .collect();
    assert_eq!(dates, vec![3, 2]);
}

fn follow_up_call(id: &str, owner_id: &str) -> Appointment {
    Appointment {
        id: id.into(),
        owner_id: owner_id.into(),
        date: day() + chrono::Duration::days(2),
        time: None,
        appointment_type: AppointmentType::Call,
        title: "Richiamare".into(),
        whatsapp_script: Some("Ciao".into()),
        voice_script: Some("Buongiorno".into()),
        created_at: Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap(),
    }
}

async fn store_with_owner_task() -> (SqliteStore, TempDir, DailyFolder, DailyTaskItem) {
    let (store, dir) = open_store().await;
    store
        .upsert_owner(&Owner {
            id: "owner-0".into(),
            name: "Anna Rossi".into(),
            address: None,
            phone: None,
            temperature: Some(Temperature::Hot),
            last_outcome: None,
            last_contact: None,
        })
        .await
        .unwrap();
    let (folder, mut tasks) = folder_with_tasks(1);
    store.insert_generation(&folder, &tasks).await.unwrap();
    (store, dir, folder, tasks.remove(0))
}

fn call_record(follow_up: Option<Appointment>) -> CallRecord {
    CallRecord {
        owner_id: "owner-0".into(),
        outcome: "richiamare".into(),
        contacted_at: Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap(),
        follow_up,
    }
}

fn resolved_counters() -> CounterDelta {
    CounterDelta {
        completed_calls: 1,
        successful_calls: 0,
        appointments_set: 0,
    }
}

#[tokio::test]
async fn resolve_task_writes_task_counters_appointment_and_owner() {
    let (store, _dir, folder, task) = store_with_owner_task().await;
    let appt = follow_up_call("f1", "owner-0");

    let outcome = store
        .resolve_task(
            &task.id,
            &[TaskStatus::Pending],
            &complete_change(),
            resolved_counters(),
            &call_record(Some(appt.clone())),
        )
        .await
        .unwrap();
    assert!(matches!(outcome, WriteOutcome::Applied(ref t) if t.status == TaskStatus::Completed));

    let folder = store.folder_by_id(&folder.id).await.unwrap().unwrap();
    assert_eq!(folder.completed_calls, 1);
    assert_eq!(store.appointments_for_owner("owner-0").await.unwrap(), vec![appt]);
    let owner = store.owner("owner-0").await.unwrap().unwrap();
    assert_eq!(owner.last_outcome.as_deref(), Some("richiamare"));
    assert!(owner.last_contact.is_some());
}

#[tokio::test]
async fn failed_appointment_insert_rolls_back_resolution() {
    let (store, _dir, folder, task) = store_with_owner_task().await;
    // An appointment with the same id makes the follow-up insert fail.
    let existing = follow_up_call("f1", "someone-else");
    store.insert_appointment(&existing).await.unwrap();

    let err = store
        .resolve_task(
            &task.id,
            &[TaskStatus::Pending],
            &complete_change(),
            resolved_counters(),
            &call_record(Some(follow_up_call("f1", "owner-0"))),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LeaddeskError::DataAccess { .. }));

    let task = store.task(&task.id).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
    assert!(task.call_outcome.is_none());
    let folder = store.folder_by_id(&folder.id).await.unwrap().unwrap();
    assert_eq!(folder.completed_calls, 0);
    assert!(store.appointments_for_owner("owner-0").await.unwrap().is_empty());
    let owner = store.owner("owner-0").await.unwrap().unwrap();
    assert!(owner.last_outcome.is_none());
}

#[tokio::test]
async fn resolve_task_on_deleted_task_writes_nothing() {
    let (store, _dir, _folder, task) = store_with_owner_task().await;
    store.delete_task(&task.id).await.unwrap();

    let outcome = store
        .resolve_task(
            &task.id,
            &[TaskStatus::Pending],
            &complete_change(),
            resolved_counters(),
            &call_record(Some(follow_up_call("f1", "owner-0"))),
        )
        .await
        .unwrap();
    assert_eq!(outcome, WriteOutcome::Missing);
    assert!(store.appointments_for_owner("owner-0").await.unwrap().is_empty());
    assert!(store.owner("owner-0").await.unwrap().unwrap().last_outcome.is_none());
}
