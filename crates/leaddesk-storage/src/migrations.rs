// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL migration files are compiled into the binary at build time via
//! `embed_migrations!`. Migrations run automatically on database open.

use leaddesk_core::LeaddeskError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Refinery tracks applied migrations in its own `refinery_schema_history` table.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), LeaddeskError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(LeaddeskError::data_access)?;
    for migration in report.applied_migrations() {
        tracing::debug!(
            name = %migration.name(),
            version = migration.version(),
            "migration applied"
        );
    }
    Ok(())
}
