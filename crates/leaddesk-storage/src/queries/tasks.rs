// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily task item queries.
//!
//! Every mutation runs in one transaction that first re-reads the task and
//! its folder, so the precondition check and the write cannot interleave
//! with another writer.

use leaddesk_core::{
    CallRecord, CounterDelta, DailyTaskItem, FolderStatus, LeaddeskError, PriorityClaim, Stamp,
    TaskChange, TaskStatus, WriteOutcome,
};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{appointments, folders, owners, parse_column};
use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, folder_id, owner_id, task_type, priority, scheduled_time, status,
                       call_outcome, notes, completed_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<DailyTaskItem> {
    Ok(DailyTaskItem {
        id: row.get(0)?,
        folder_id: row.get(1)?,
        owner_id: row.get(2)?,
        task_type: parse_column(row, 3)?,
        priority: row.get(4)?,
        scheduled_time: row.get(5)?,
        status: parse_column(row, 6)?,
        call_outcome: row.get(7)?,
        notes: row.get(8)?,
        completed_at: row.get(9)?,
    })
}

fn by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<DailyTaskItem>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM daily_task_items WHERE id = ?1"),
        params![id],
        from_row,
    )
    .optional()
}

/// Bulk insert used by folder generation. Runs inside the caller's transaction.
pub(crate) fn insert_all(conn: &Connection, items: &[DailyTaskItem]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO daily_task_items ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
    ))?;
    for item in items {
        stmt.execute(params![
            item.id,
            item.folder_id,
            item.owner_id,
            item.task_type.to_string(),
            item.priority,
            item.scheduled_time,
            item.status.to_string(),
            item.call_outcome,
            item.notes,
            item.completed_at,
        ])?;
    }
    Ok(())
}

/// Where a task stands before a conditional write.
enum Precondition {
    Missing,
    FolderInactive(FolderStatus),
    Ready(DailyTaskItem),
}

fn check(conn: &Connection, id: &str) -> rusqlite::Result<Precondition> {
    let Some(task) = by_id(conn, id)? else {
        return Ok(Precondition::Missing);
    };
    match folders::status_of(conn, &task.folder_id)? {
        None => Ok(Precondition::Missing),
        Some(FolderStatus::Active) => Ok(Precondition::Ready(task)),
        Some(status) => Ok(Precondition::FolderInactive(status)),
    }
}

pub async fn task(db: &Database, id: &str) -> Result<Option<DailyTaskItem>, LeaddeskError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<_, rusqlite::Error> { by_id(conn, &id) })
        .await
        .map_err(map_tr_err)
}

/// All tasks of a folder, highest priority first, insertion order on ties.
pub async fn tasks_for_folder(
    db: &Database,
    folder_id: &str,
) -> Result<Vec<DailyTaskItem>, LeaddeskError> {
    let folder_id = folder_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<DailyTaskItem>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM daily_task_items WHERE folder_id = ?1
                 ORDER BY priority DESC, rowid ASC"
            ))?;
            let rows = stmt.query_map(params![folder_id], from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn count_tasks(db: &Database, folder_id: &str) -> Result<usize, LeaddeskError> {
    let folder_id = folder_id.to_string();
    let count = db
        .connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM daily_task_items WHERE folder_id = ?1",
                params![folder_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)?;
    Ok(usize::try_from(count).unwrap_or(0))
}

/// Applies `change` and the counter increments inside the caller's transaction.
fn change_in(
    tx: &Connection,
    id: &str,
    expected: &[TaskStatus],
    change: &TaskChange,
    counters: CounterDelta,
) -> rusqlite::Result<WriteOutcome<DailyTaskItem>> {
    let task = match check(tx, id)? {
        Precondition::Missing => return Ok(WriteOutcome::Missing),
        Precondition::FolderInactive(s) => return Ok(WriteOutcome::FolderInactive(s)),
        Precondition::Ready(task) => task,
    };
    if !expected.contains(&task.status) {
        return Ok(WriteOutcome::StatusMismatch(task.status));
    }

    let (touch_completed, completed_at) = match change.completed_at {
        Stamp::Keep => (false, None),
        Stamp::Set(at) => (true, Some(at)),
        Stamp::Clear => (true, None),
    };
    tx.execute(
        "UPDATE daily_task_items SET
             status = ?1,
             call_outcome = COALESCE(?2, call_outcome),
             notes = COALESCE(?3, notes),
             completed_at = CASE WHEN ?4 THEN ?5 ELSE completed_at END
         WHERE id = ?6",
        params![
            change.status.to_string(),
            change.call_outcome,
            change.notes,
            touch_completed,
            completed_at,
            id,
        ],
    )?;
    if !counters.is_zero() {
        tx.execute(
            "UPDATE daily_folders SET
                 completed_calls = completed_calls + ?1,
                 successful_calls = successful_calls + ?2,
                 appointments_set = appointments_set + ?3
             WHERE id = ?4 AND status = 'active'",
            params![
                counters.completed_calls,
                counters.successful_calls,
                counters.appointments_set,
                task.folder_id,
            ],
        )?;
    }
    Ok(by_id(tx, id)?.map_or(WriteOutcome::Missing, WriteOutcome::Applied))
}

/// Applies a status change plus folder counter increments atomically.
pub async fn apply_change(
    db: &Database,
    id: &str,
    expected: &[TaskStatus],
    change: &TaskChange,
    counters: CounterDelta,
) -> Result<WriteOutcome<DailyTaskItem>, LeaddeskError> {
    let id = id.to_string();
    let expected = expected.to_vec();
    let change = change.clone();
    db.connection()
        .call(move |conn| -> Result<WriteOutcome<DailyTaskItem>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let outcome = change_in(&tx, &id, &expected, &change, counters)?;
            tx.commit()?;
            Ok(outcome)
        })
        .await
        .map_err(map_tr_err)
}

/// Resolves a call in one transaction: task, counters, follow-up appointment,
/// and the owner's last contact. Any failure rolls all of it back.
pub async fn resolve_task(
    db: &Database,
    id: &str,
    expected: &[TaskStatus],
    change: &TaskChange,
    counters: CounterDelta,
    record: &CallRecord,
) -> Result<WriteOutcome<DailyTaskItem>, LeaddeskError> {
    let id = id.to_string();
    let expected = expected.to_vec();
    let change = change.clone();
    let record = record.clone();
    db.connection()
        .call(move |conn| -> Result<WriteOutcome<DailyTaskItem>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let outcome = change_in(&tx, &id, &expected, &change, counters)?;
            if !matches!(outcome, WriteOutcome::Applied(_)) {
                return Ok(outcome);
            }
            if let Some(appointment) = &record.follow_up {
                appointments::insert_row(&tx, appointment)?;
            }
            owners::record_contact_row(
                &tx,
                &record.owner_id,
                &record.outcome,
                record.contacted_at,
            )?;
            tx.commit()?;
            Ok(outcome)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn set_notes(
    db: &Database,
    id: &str,
    notes: &str,
) -> Result<WriteOutcome<DailyTaskItem>, LeaddeskError> {
    let id = id.to_string();
    let notes = notes.to_string();
    db.connection()
        .call(move |conn| -> Result<WriteOutcome<DailyTaskItem>, rusqlite::Error> {
            let tx = conn.transaction()?;
            match check(&tx, &id)? {
                Precondition::Missing => return Ok(WriteOutcome::Missing),
                Precondition::FolderInactive(s) => return Ok(WriteOutcome::FolderInactive(s)),
                Precondition::Ready(_) => {}
            }
            tx.execute(
                "UPDATE daily_task_items SET notes = ?1 WHERE id = ?2",
                params![notes, id],
            )?;
            let updated = by_id(&tx, &id)?;
            tx.commit()?;
            Ok(updated.map_or(WriteOutcome::Missing, WriteOutcome::Applied))
        })
        .await
        .map_err(map_tr_err)
}

/// Swaps two priorities if both tasks still hold the claimed values.
pub async fn swap_priorities(
    db: &Database,
    first: &PriorityClaim,
    second: &PriorityClaim,
) -> Result<WriteOutcome<(DailyTaskItem, DailyTaskItem)>, LeaddeskError> {
    let first = first.clone();
    let second = second.clone();
    db.connection()
        .call(
            move |conn| -> Result<WriteOutcome<(DailyTaskItem, DailyTaskItem)>, rusqlite::Error> {
                let tx = conn.transaction()?;
                for claim in [&first, &second] {
                    match check(&tx, &claim.task_id)? {
                        Precondition::Missing => return Ok(WriteOutcome::Missing),
                        Precondition::FolderInactive(s) => {
                            return Ok(WriteOutcome::FolderInactive(s));
                        }
                        Precondition::Ready(task) if task.priority != claim.priority => {
                            return Ok(WriteOutcome::Stale);
                        }
                        Precondition::Ready(_) => {}
                    }
                }
                let mut stmt =
                    tx.prepare("UPDATE daily_task_items SET priority = ?1 WHERE id = ?2")?;
                stmt.execute(params![second.priority, first.task_id])?;
                stmt.execute(params![first.priority, second.task_id])?;
                drop(stmt);

                let a = by_id(&tx, &first.task_id)?;
                let b = by_id(&tx, &second.task_id)?;
                tx.commit()?;
                Ok(match (a, b) {
                    (Some(a), Some(b)) => WriteOutcome::Applied((a, b)),
                    _ => WriteOutcome::Missing,
                })
            },
        )
        .await
        .map_err(map_tr_err)
}

pub async fn delete_task(db: &Database, id: &str) -> Result<WriteOutcome<()>, LeaddeskError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<WriteOutcome<()>, rusqlite::Error> {
            let tx = conn.transaction()?;
            match check(&tx, &id)? {
                Precondition::Missing => return Ok(WriteOutcome::Missing),
                Precondition::FolderInactive(s) => return Ok(WriteOutcome::FolderInactive(s)),
                Precondition::Ready(_) => {}
            }
            tx.execute("DELETE FROM daily_task_items WHERE id = ?1", params![id])?;
            tx.commit()?;
            Ok(WriteOutcome::Applied(()))
        })
        .await
        .map_err(map_tr_err)
}
