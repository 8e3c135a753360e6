// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use leaddesk_core::LeaddeskError;
use tracing::debug;

use crate::migrations::run_migrations;

/// Handle to the single SQLite writer connection.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path`, applies PRAGMAs,
    /// and runs pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, LeaddeskError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(LeaddeskError::data_access)?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| -> Result<Result<(), LeaddeskError>, rusqlite::Error> {
            Ok(run_migrations(conn))
        })
        .await
        .map_err(map_tr_err)??;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoints the WAL so the main database file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), LeaddeskError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

/// Convert tokio-rusqlite errors to [`LeaddeskError::DataAccess`].
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> LeaddeskError {
    LeaddeskError::DataAccess {
        source: format!("database error: {e}").into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_file_and_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("leaddesk.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();
        assert!(path.exists());

        let tables: Vec<String> = db
            .connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                     AND name != 'refinery_schema_history' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect()
            })
            .await
            .unwrap();
        assert_eq!(
            tables,
            vec![
                "appointments",
                "daily_folders",
                "daily_task_items",
                "notifications",
                "owners"
            ]
        );
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("leaddesk.db");
        let path = path.to_str().unwrap();
        Database::open(path, true).await.unwrap();
        let db = Database::open(path, false).await.unwrap();
        db.checkpoint().await.unwrap();
    }
}
