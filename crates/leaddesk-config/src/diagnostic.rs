// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment errors are turned into [`ConfigError`]s that miette renders with
//! the offending line of `leaddesk.toml` and, for misspelled keys, the closest
//! key of the same section.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Keys accepted in each section of `leaddesk.toml`.
pub const SECTIONS: &[(&str, &[&str])] = &[
    ("app", &["name", "log_level"]),
    ("storage", &["database_path", "wal_mode"]),
    (
        "scheduler",
        &[
            "enabled",
            "generation_hour",
            "closing_hour",
            "poll_interval_secs",
            "state_path",
        ],
    ),
];

/// Jaro-Winkler score below which no suggestion is offered.
const SUGGESTION_THRESHOLD: f64 = 0.8;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key or section `leaddesk.toml` does not define.
    #[error("unknown key `{key}` in {}", scope(.section.as_deref()))]
    #[diagnostic(
        code(leaddesk::config::unknown_key),
        help("{}", unknown_key_help(section.as_deref(), suggestion.as_deref()))
    )]
    UnknownKey {
        key: String,
        section: Option<String>,
        suggestion: Option<String>,
        #[label("not a Leaddesk setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that does not deserialize into the setting's type.
    #[error("`{key}` expects {expected}, found {found}")]
    #[diagnostic(code(leaddesk::config::invalid_type), help("{}", value_hint(key)))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
        #[label("wrong type")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A well-typed value outside its allowed range.
    #[error("validation error: {message}")]
    #[diagnostic(code(leaddesk::config::validation), help("{}", value_hint(key)))]
    Validation { key: &'static str, message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(leaddesk::config::other))]
    Other(String),
}

fn scope(section: Option<&str>) -> String {
    section.map_or_else(|| "the top level".to_string(), |s| format!("[{s}]"))
}

/// Keys of `section`, or the section names themselves for the top level.
fn keys_of(section: Option<&str>) -> Vec<&'static str> {
    match section {
        None => SECTIONS.iter().map(|(name, _)| *name).collect(),
        Some(section) => SECTIONS
            .iter()
            .find(|(name, _)| *name == section)
            .map(|(_, keys)| keys.to_vec())
            .unwrap_or_default(),
    }
}

fn unknown_key_help(section: Option<&str>, suggestion: Option<&str>) -> String {
    let valid = keys_of(section).join(", ");
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Accepted here: {valid}"),
        None => format!("accepted here: {valid}"),
    }
}

fn value_hint(key: &str) -> &'static str {
    match key {
        "scheduler.generation_hour" | "scheduler.closing_hour" => {
            "hours are local wall-clock hours from 0 to 23, and closing must come after generation"
        }
        "scheduler.poll_interval_secs" => "a positive number of seconds, e.g. 300",
        "app.log_level" => "one of trace, debug, info, warn, error",
        "storage.wal_mode" | "scheduler.enabled" => "true or false",
        _ => "see the [app], [storage] and [scheduler] sections of leaddesk.toml",
    }
}

/// Closest accepted key to `unknown` within `section`.
pub fn suggest_key(unknown: &str, section: Option<&str>) -> Option<&'static str> {
    keys_of(section)
        .into_iter()
        .map(|key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key)
}

/// Byte offset of `key` inside `[section]` (or before the first header when
/// `section` is `None`).
pub fn locate_key(content: &str, section: Option<&str>, key: &str) -> Option<usize> {
    let mut current: Option<&str> = None;
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            current = Some(header.trim());
            if section.is_none() && header.trim() == key {
                return Some(offset + line.find(key)?);
            }
        } else if current == section {
            let indent = line.len() - line.trim_start().len();
            let name = trimmed.split('=').next().unwrap_or("").trim();
            if name == key {
                return Some(offset + indent);
            }
        }
        offset += line.len();
    }
    None
}

/// Path of a figment error split into its section and key.
fn split_path(error: &figment::error::Error) -> (Option<String>, Option<String>) {
    let mut parts: Vec<String> = error.path.iter().map(ToString::to_string).collect();
    let key = parts.pop();
    (parts.into_iter().next(), key)
}

fn source_for(
    error: &figment::error::Error,
    sources: &[(String, String)],
) -> Option<(String, String)> {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|source| match source {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });
    match file {
        Some(path) => sources.iter().find(|(p, _)| *p == path).cloned(),
        // Inline TOML has no file path; it is the only source.
        None if sources.len() == 1 => sources.first().cloned(),
        None => None,
    }
}

fn spanned(
    error: &figment::error::Error,
    sources: &[(String, String)],
    section: Option<&str>,
    key: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some((path, content)) = source_for(error, sources) else {
        return (None, None);
    };
    match locate_key(&content, section, key) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), key.len())),
            Some(NamedSource::new(path, content)),
        ),
        None => (None, None),
    }
}

/// Converts every error inside a figment error into a [`ConfigError`].
///
/// `sources` pairs each TOML file path with its content and is used to point
/// the diagnostic at the offending line.
pub fn figment_to_config_errors(
    err: figment::Error,
    sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, _) => {
                // The path of an unknown field ends at its parent table.
                let section = error.path.first().cloned();
                let suggestion = suggest_key(field, section.as_deref()).map(str::to_string);
                let (span, src) = spanned(&error, sources, section.as_deref(), field);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    section,
                    suggestion,
                    span,
                    src,
                }
            }
            Kind::InvalidType(found, expected) => {
                let (section, key) = split_path(&error);
                let key_name = key.unwrap_or_default();
                let (span, src) = spanned(&error, sources, section.as_deref(), &key_name);
                ConfigError::InvalidType {
                    key: match section {
                        Some(section) => format!("{section}.{key_name}"),
                        None => key_name,
                    },
                    found: found.to_string(),
                    expected: expected.to_string(),
                    span,
                    src,
                }
            }
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// Prints each error to stderr through miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}
