// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owner registry port, owned by the CRM's CRUD subsystem.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::LeaddeskError;
use crate::types::Owner;

/// Read access to the owner roster plus the two fields the call flow writes.
#[async_trait]
pub trait OwnerDirectory: Send + Sync {
    /// All owners in listing order. The order breaks priority ties.
    async fn list_owners(&self) -> Result<Vec<Owner>, LeaddeskError>;

    async fn owner(&self, id: &str) -> Result<Option<Owner>, LeaddeskError>;

    /// Records the last outcome and contact time. Returns `false` if the owner is gone.
    async fn record_contact(
        &self,
        owner_id: &str,
        outcome: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, LeaddeskError>;
}
