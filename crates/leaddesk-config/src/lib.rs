// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Leaddesk.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and diagnostic
//! error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use leaddesk_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("closing at {}:00", config.scheduler.closing_hour);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::LeaddeskConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// On a Figment error the TOML sources are re-read so diagnostics can point
/// at the offending key.
pub fn load_and_validate() -> Result<LeaddeskConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<LeaddeskConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<LeaddeskConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<LeaddeskConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<LeaddeskConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = vec![
        std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG))
            .unwrap_or_else(|_| loader::LOCAL_CONFIG.into()),
    ];
    candidates.extend(loader::user_config_path());
    candidates.push(loader::SYSTEM_CONFIG.into());

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
