// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily folder queries.

use chrono::{DateTime, NaiveDate, Utc};
use leaddesk_core::{DailyFolder, DailyTaskItem, FolderStatus, LeaddeskError, WriteOutcome};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior, params};

use super::{parse_column, parse_status, tasks};
use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, date, status, total_contacts, total_followups, completed_calls,
                       successful_calls, appointments_set, started_at, closed_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<DailyFolder> {
    Ok(DailyFolder {
        id: row.get(0)?,
        date: row.get(1)?,
        status: parse_column(row, 2)?,
        total_contacts: row.get(3)?,
        total_followups: row.get(4)?,
        completed_calls: row.get(5)?,
        successful_calls: row.get(6)?,
        appointments_set: row.get(7)?,
        started_at: row.get(8)?,
        closed_at: row.get(9)?,
    })
}

pub(crate) fn by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<DailyFolder>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM daily_folders WHERE id = ?1"),
        params![id],
        from_row,
    )
    .optional()
}

fn by_date(conn: &Connection, date: NaiveDate) -> rusqlite::Result<Option<DailyFolder>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM daily_folders WHERE date = ?1"),
        params![date],
        from_row,
    )
    .optional()
}

/// Look up a folder by its calendar date.
pub async fn folder_by_date(
    db: &Database,
    date: NaiveDate,
) -> Result<Option<DailyFolder>, LeaddeskError> {
    db.connection()
        .call(move |conn| -> Result<_, rusqlite::Error> { by_date(conn, date) })
        .await
        .map_err(map_tr_err)
}

pub async fn folder_by_id(db: &Database, id: &str) -> Result<Option<DailyFolder>, LeaddeskError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<_, rusqlite::Error> { by_id(conn, &id) })
        .await
        .map_err(map_tr_err)
}

fn is_duplicate_date(e: &rusqlite::Error) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(err, Some(msg)) => {
            err.code == ErrorCode::ConstraintViolation && msg.contains("daily_folders.date")
        }
        _ => false,
    }
}

/// Inserts a folder and all its items in one IMMEDIATE transaction.
///
/// A folder already present for the date (including one committed by another
/// process) yields [`LeaddeskError::AlreadyGenerated`] and writes nothing.
pub async fn insert_generation(
    db: &Database,
    folder: &DailyFolder,
    items: &[DailyTaskItem],
) -> Result<(), LeaddeskError> {
    let folder = folder.clone();
    let items = items.to_vec();
    let date = folder.date;
    let inserted = db
        .connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let result = tx.execute(
                &format!(
                    "INSERT INTO daily_folders ({COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                params![
                    folder.id,
                    folder.date,
                    folder.status.to_string(),
                    folder.total_contacts,
                    folder.total_followups,
                    folder.completed_calls,
                    folder.successful_calls,
                    folder.appointments_set,
                    folder.started_at,
                    folder.closed_at,
                ],
            );
            match result {
                Ok(_) => {}
                Err(e) if is_duplicate_date(&e) => return Ok(false),
                Err(e) => return Err(e),
            }
            tasks::insert_all(&tx, &items)?;
            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(map_tr_err)?;

    if inserted {
        Ok(())
    } else {
        Err(LeaddeskError::AlreadyGenerated { date })
    }
}

/// Marks an active folder completed. Only an `active` row is touched.
pub async fn close_folder(
    db: &Database,
    id: &str,
    closed_at: DateTime<Utc>,
) -> Result<WriteOutcome<DailyFolder>, LeaddeskError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<WriteOutcome<DailyFolder>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE daily_folders SET status = 'completed', closed_at = ?1
                 WHERE id = ?2 AND status = 'active'",
                params![closed_at, id],
            )?;
            let current = by_id(&tx, &id)?;
            tx.commit()?;
            Ok(match (changed, current) {
                (_, None) => WriteOutcome::Missing,
                (0, Some(folder)) => WriteOutcome::FolderInactive(folder.status),
                (_, Some(folder)) => WriteOutcome::Applied(folder),
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Most recent folders, newest date first.
pub async fn recent_folders(
    db: &Database,
    limit: usize,
) -> Result<Vec<DailyFolder>, LeaddeskError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| -> Result<Vec<DailyFolder>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM daily_folders ORDER BY date DESC LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit], from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Status of a folder, read inside an open transaction.
pub(crate) fn status_of(conn: &Connection, id: &str) -> rusqlite::Result<Option<FolderStatus>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT status FROM daily_folders WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    raw.as_deref().map(parse_status).transpose()
}
