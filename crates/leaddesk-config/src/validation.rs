// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the constraints serde cannot express: hour ranges, the ordering of
//! the two trigger hours, and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::LeaddeskConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

fn invalid(errors: &mut Vec<ConfigError>, key: &'static str, message: String) {
    errors.push(ConfigError::Validation { key, message });
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LeaddeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.app.name.trim().is_empty() {
        invalid(
            &mut errors,
            "app.name",
            "app.name must not be empty".to_string(),
        );
    }

    let level = config.app.log_level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        invalid(
            &mut errors,
            "app.log_level",
            format!(
                "app.log_level `{}` is not one of {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        );
    }

    if config.storage.database_path.trim().is_empty() {
        invalid(
            &mut errors,
            "storage.database_path",
            "storage.database_path must not be empty".to_string(),
        );
    }

    let scheduler = &config.scheduler;
    if scheduler.generation_hour > 23 {
        invalid(
            &mut errors,
            "scheduler.generation_hour",
            format!(
                "scheduler.generation_hour must be between 0 and 23, got {}",
                scheduler.generation_hour
            ),
        );
    }
    if scheduler.closing_hour > 23 {
        invalid(
            &mut errors,
            "scheduler.closing_hour",
            format!(
                "scheduler.closing_hour must be between 0 and 23, got {}",
                scheduler.closing_hour
            ),
        );
    }
    if scheduler.closing_hour <= scheduler.generation_hour {
        invalid(
            &mut errors,
            "scheduler.closing_hour",
            format!(
                "scheduler.closing_hour ({}) must be later than scheduler.generation_hour ({})",
                scheduler.closing_hour, scheduler.generation_hour
            ),
        );
    }
    if scheduler.poll_interval_secs == 0 {
        invalid(
            &mut errors,
            "scheduler.poll_interval_secs",
            "scheduler.poll_interval_secs must be greater than 0".to_string(),
        );
    }
    if scheduler.state_path.trim().is_empty() {
        invalid(
            &mut errors,
            "scheduler.state_path",
            "scheduler.state_path must not be empty".to_string(),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
