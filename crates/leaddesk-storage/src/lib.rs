// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for Leaddesk.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and transactional implementations
//! of the folder, task, owner, appointment, and notification ports.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
pub use queries::notifications::OutboxEntry;
