// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./leaddesk.toml` > `~/.config/leaddesk/leaddesk.toml`
//! > `/etc/leaddesk/leaddesk.toml`, with environment variable overrides via the
//! `LEADDESK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LeaddeskConfig;

pub const SYSTEM_CONFIG: &str = "/etc/leaddesk/leaddesk.toml";
pub const LOCAL_CONFIG: &str = "leaddesk.toml";

/// `$XDG_CONFIG_HOME/leaddesk/leaddesk.toml`, if a config dir is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("leaddesk").join("leaddesk.toml"))
}

/// Build the layered Figment without extracting it.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/leaddesk/leaddesk.toml` (system-wide)
/// 3. `~/.config/leaddesk/leaddesk.toml` (user XDG config)
/// 4. `./leaddesk.toml` (local directory)
/// 5. `LEADDESK_*` environment variables
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LeaddeskConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
pub fn load_config() -> Result<LeaddeskConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<LeaddeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeaddeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LeaddeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeaddeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Maps `LEADDESK_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `LEADDESK_SCHEDULER_CLOSING_HOUR` is `scheduler.closing_hour`.
fn env_provider() -> Env {
    Env::prefixed("LEADDESK_").map(|key| {
        let key = key.as_str().to_ascii_lowercase();
        let mapped = ["app", "storage", "scheduler"]
            .iter()
            .find_map(|section| {
                key.strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(key);
        mapped.into()
    })
}
