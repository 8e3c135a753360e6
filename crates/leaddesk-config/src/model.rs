// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Leaddesk.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Leaddesk configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LeaddeskConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Daily trigger settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name used in logs and CLI output.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "leaddesk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn data_file(name: &str) -> String {
    dirs::data_dir()
        .map(|p| p.join("leaddesk").join(name))
        .unwrap_or_else(|| PathBuf::from(name))
        .to_string_lossy()
        .into_owned()
}

fn default_database_path() -> String {
    data_file("leaddesk.db")
}

fn default_wal_mode() -> bool {
    true
}

/// Daily generation and closing trigger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Run the periodic trigger loop under `leaddesk serve`.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Local hour (0-23) from which today's folder is generated.
    #[serde(default = "default_generation_hour")]
    pub generation_hour: u32,

    /// Local hour (0-23) from which today's folder is closed.
    #[serde(default = "default_closing_hour")]
    pub closing_hour: u32,

    /// Seconds between trigger checks.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// JSON file recording the last generation and closing dates.
    #[serde(default = "default_state_path")]
    pub state_path: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            generation_hour: default_generation_hour(),
            closing_hour: default_closing_hour(),
            poll_interval_secs: default_poll_interval_secs(),
            state_path: default_state_path(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_generation_hour() -> u32 {
    8
}

fn default_closing_hour() -> u32 {
    20
}

fn default_poll_interval_secs() -> u64 {
    300
}

fn default_state_path() -> String {
    data_file("trigger_state.json")
}
