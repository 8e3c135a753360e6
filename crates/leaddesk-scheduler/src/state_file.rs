// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON file backing for the trigger state.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use leaddesk_core::{LeaddeskError, SchedulerState, TriggerStateStore};

/// Stores [`SchedulerState`] as a small JSON document.
///
/// Saves go through a temporary sibling file and a rename, so a crash
/// mid-write leaves the previous state intact.
#[derive(Debug, Clone)]
pub struct JsonStateFile {
    path: PathBuf,
}

impl JsonStateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TriggerStateStore for JsonStateFile {
    async fn load(&self) -> Result<SchedulerState, LeaddeskError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(LeaddeskError::data_access),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SchedulerState::default()),
            Err(e) => Err(LeaddeskError::data_access(e)),
        }
    }

    async fn save(&self, state: &SchedulerState) -> Result<(), LeaddeskError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(LeaddeskError::data_access)?;
            }
        }
        let json = serde_json::to_vec_pretty(state).map_err(LeaddeskError::data_access)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(LeaddeskError::data_access)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(LeaddeskError::data_access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateFile::new(dir.path().join("state.json"));
        assert_eq!(store.load().await.unwrap(), SchedulerState::default());
    }

    #[tokio::test]
    async fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let state = SchedulerState {
            last_generated: NaiveDate::from_ymd_opt(2024, 1, 10),
            last_closed: None,
        };
        JsonStateFile::new(&path).save(&state).await.unwrap();

        let reopened = JsonStateFile::new(&path);
        assert_eq!(reopened.load().await.unwrap(), state);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_data_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"not json").unwrap();
        let err = JsonStateFile::new(&path).load().await.unwrap_err();
        assert!(matches!(err, LeaddeskError::DataAccess { .. }));
    }
}
