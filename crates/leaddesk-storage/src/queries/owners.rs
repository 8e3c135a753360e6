// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owner roster queries.

use chrono::{DateTime, Utc};
use leaddesk_core::{LeaddeskError, Owner};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::parse_optional;
use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, name, address, phone, temperature, last_outcome, last_contact";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Owner> {
    Ok(Owner {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
        temperature: parse_optional(row, 4)?,
        last_outcome: row.get(5)?,
        last_contact: row.get(6)?,
    })
}

/// Inserts or updates an owner, keeping its listing position on update.
pub async fn upsert_owner(db: &Database, owner: &Owner) -> Result<(), LeaddeskError> {
    let owner = owner.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO owners (id, name, address, phone, temperature, last_outcome, last_contact)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT (id) DO UPDATE SET
                     name = excluded.name,
                     address = excluded.address,
                     phone = excluded.phone,
                     temperature = excluded.temperature,
                     last_outcome = excluded.last_outcome,
                     last_contact = excluded.last_contact",
                params![
                    owner.id,
                    owner.name,
                    owner.address,
                    owner.phone,
                    owner.temperature.map(|t| t.to_string()),
                    owner.last_outcome,
                    owner.last_contact,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// All owners in listing order.
pub async fn list_owners(db: &Database) -> Result<Vec<Owner>, LeaddeskError> {
    db.connection()
        .call(|conn| -> Result<Vec<Owner>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM owners ORDER BY rowid"))?;
            let rows = stmt.query_map([], from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn owner(db: &Database, id: &str) -> Result<Option<Owner>, LeaddeskError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Owner>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM owners WHERE id = ?1"),
                params![id],
                from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Updates the last outcome and contact time inside the caller's transaction.
/// Returns the number of owners changed.
pub(crate) fn record_contact_row(
    conn: &Connection,
    owner_id: &str,
    outcome: &str,
    at: DateTime<Utc>,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE owners SET last_outcome = ?1, last_contact = ?2 WHERE id = ?3",
        params![outcome, at, owner_id],
    )
}

/// Stores the last call outcome and contact time. `false` if the owner is gone.
pub async fn record_contact(
    db: &Database,
    owner_id: &str,
    outcome: &str,
    at: DateTime<Utc>,
) -> Result<bool, LeaddeskError> {
    let owner_id = owner_id.to_string();
    let outcome = outcome.to_string();
    let changed = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            record_contact_row(conn, &owner_id, &outcome, at)
        })
        .await
        .map_err(map_tr_err)?;
    Ok(changed > 0)
}
