// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment queries.

use chrono::NaiveDate;
use leaddesk_core::{Appointment, LeaddeskError};
use rusqlite::{Connection, Row, params};

use super::parse_column;
use crate::database::{Database, map_tr_err};

const COLUMNS: &str =
    "id, owner_id, date, time, appointment_type, title, whatsapp_script, voice_script, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        date: row.get(2)?,
        time: row.get(3)?,
        appointment_type: parse_column(row, 4)?,
        title: row.get(5)?,
        whatsapp_script: row.get(6)?,
        voice_script: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Inserts one appointment. Runs inside the caller's transaction.
pub(crate) fn insert_row(conn: &Connection, appt: &Appointment) -> rusqlite::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO appointments ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        params![
            appt.id,
            appt.owner_id,
            appt.date,
            appt.time,
            appt.appointment_type.to_string(),
            appt.title,
            appt.whatsapp_script,
            appt.voice_script,
            appt.created_at,
        ],
    )?;
    Ok(())
}

pub async fn insert_appointment(db: &Database, appt: &Appointment) -> Result<(), LeaddeskError> {
    let appt = appt.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> { insert_row(conn, &appt) })
        .await
        .map_err(map_tr_err)
}

/// Appointments dated `date`, timed ones first.
pub async fn appointments_on(
    db: &Database,
    date: NaiveDate,
) -> Result<Vec<Appointment>, LeaddeskError> {
    db.connection()
        .call(move |conn| -> Result<Vec<Appointment>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM appointments WHERE date = ?1
                 ORDER BY time IS NULL, time, rowid"
            ))?;
            let rows = stmt.query_map(params![date], from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// All appointments booked for one owner, oldest date first.
pub async fn appointments_for_owner(
    db: &Database,
    owner_id: &str,
) -> Result<Vec<Appointment>, LeaddeskError> {
    let owner_id = owner_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Appointment>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM appointments WHERE owner_id = ?1 ORDER BY date, rowid"
            ))?;
            let rows = stmt.query_map(params![owner_id], from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
