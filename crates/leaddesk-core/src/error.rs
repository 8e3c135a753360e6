// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Leaddesk daily task lifecycle.

use chrono::NaiveDate;
use thiserror::Error;

/// The primary error type returned by every lifecycle operation and port.
#[derive(Debug, Error)]
pub enum LeaddeskError {
    /// Configuration errors (invalid TOML, missing required fields, bad ranges).
    #[error("configuration error: {0}")]
    Config(String),

    /// A folder already exists for the requested date.
    #[error("daily folder for {date} has already been generated")]
    AlreadyGenerated { date: NaiveDate },

    /// The folder for the requested date has already been closed.
    #[error("daily folder for {date} has already been closed")]
    AlreadyClosed { date: NaiveDate },

    /// A referenced folder, task, or owner does not exist.
    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },

    /// The requested mutation is not allowed from the current state.
    #[error("invalid transition for `{id}`: {message}")]
    InvalidTransition { id: String, message: String },

    /// The folder was created but its stored item count does not match the plan.
    #[error(
        "generation of folder {folder_id} is inconsistent: expected {expected} items, found {actual}"
    )]
    GenerationPartialFailure {
        folder_id: String,
        expected: usize,
        actual: usize,
    },

    /// External data store errors (connection, query failure, serialization).
    #[error("data access error: {source}")]
    DataAccess {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LeaddeskError {
    /// Shorthand for [`LeaddeskError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Shorthand for [`LeaddeskError::InvalidTransition`].
    pub fn invalid_transition(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTransition {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Wraps any error as a [`LeaddeskError::DataAccess`].
    pub fn data_access<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DataAccess {
            source: Box::new(source),
        }
    }

    /// True for the benign "already generated" / "already closed" guards.
    ///
    /// The trigger layer treats these as no-ops rather than failures.
    pub fn is_idempotency_guard(&self) -> bool {
        matches!(
            self,
            Self::AlreadyGenerated { .. } | Self::AlreadyClosed { .. }
        )
    }
}
