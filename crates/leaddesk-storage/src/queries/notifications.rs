// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification outbox queries.

use leaddesk_core::LeaddeskError;
use rusqlite::params;
use serde_json::Value;

use crate::database::{Database, map_tr_err};

/// One undelivered change event.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxEntry {
    pub id: i64,
    pub kind: String,
    pub payload: Value,
    pub created_at: String,
}

pub async fn enqueue(db: &Database, kind: &str, payload: String) -> Result<i64, LeaddeskError> {
    let kind = kind.to_string();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO notifications (kind, payload) VALUES (?1, ?2)",
                params![kind, payload],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Oldest undelivered entries first.
pub async fn pending(db: &Database, limit: usize) -> Result<Vec<OutboxEntry>, LeaddeskError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = db
        .connection()
        .call(move |conn| -> Result<Vec<(i64, String, String, String)>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, kind, payload, created_at FROM notifications
                 WHERE delivered_at IS NULL ORDER BY id LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)?;

    rows.into_iter()
        .map(|(id, kind, payload, created_at)| {
            Ok(OutboxEntry {
                id,
                kind,
                payload: serde_json::from_str(&payload).map_err(LeaddeskError::data_access)?,
                created_at,
            })
        })
        .collect()
}

pub async fn mark_delivered(db: &Database, id: i64) -> Result<(), LeaddeskError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "UPDATE notifications SET delivered_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
