// SPDX-FileCopyrightText: 2026 Leaddesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Free-text call outcome classification.
//!
//! Agents record outcomes as free text ("Richiamare", "Occupato adesso",
//! "Appuntamento Fissato", ...). The text is translated into an
//! [`OutcomeCategory`] exactly once, here; everything downstream branches on
//! the category only.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Closed set of outcome classes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OutcomeCategory {
    CallBack,
    Interested,
    AppointmentSet,
    NoAnswer,
    NotInterested,
    AwaitingInfo,
    /// Sold, deceased, wrong number: the lead is dead.
    Terminal,
    Other,
}

/// Match table, checked top to bottom. The first rule that matches wins.
const PATTERNS: &[(OutcomeCategory, &[&str])] = &[
    (
        OutcomeCategory::CallBack,
        &["richiamare", "call_back", "call back"],
    ),
    (OutcomeCategory::Interested, &["interessato", "interested"]),
    (OutcomeCategory::AppointmentSet, &["appuntamento", "visita"]),
    (
        OutcomeCategory::NoAnswer,
        &["non risponde", "occupato", "assente"],
    ),
    (
        OutcomeCategory::NotInterested,
        &["non interessato", "rifiuta", "not interested"],
    ),
    (OutcomeCategory::Terminal, &["venduto", "deceduto", "errato"]),
    (OutcomeCategory::AwaitingInfo, &["attesa info"]),
];

/// Negated forms that must not count as interest.
const NOT_INTERESTED: &[&str] = &["non interessato", "not interested"];

fn matches(category: OutcomeCategory, needles: &[&str], normalized: &str) -> bool {
    if category == OutcomeCategory::Interested
        && NOT_INTERESTED.iter().any(|n| normalized.contains(n))
    {
        return false;
    }
    needles.iter().any(|n| normalized.contains(n))
}

impl OutcomeCategory {
    /// Classifies a free-text outcome label, case-insensitively.
    pub fn classify(outcome: &str) -> Self {
        let normalized = outcome.trim().to_lowercase();
        PATTERNS
            .iter()
            .find(|(category, needles)| matches(*category, needles, &normalized))
            .map(|(category, _)| *category)
            .unwrap_or(OutcomeCategory::Other)
    }

    /// Outcomes that put the owner back on the callback list.
    pub fn is_retry(self) -> bool {
        matches!(
            self,
            OutcomeCategory::CallBack | OutcomeCategory::NoAnswer | OutcomeCategory::AwaitingInfo
        )
    }

    /// Outcomes counted as a successful call.
    pub fn is_successful(self) -> bool {
        matches!(
            self,
            OutcomeCategory::Interested | OutcomeCategory::AppointmentSet
        )
    }

    pub fn sets_appointment(self) -> bool {
        self == OutcomeCategory::AppointmentSet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_labels() {
        let cases = [
            ("Richiamare", OutcomeCategory::CallBack),
            ("call_back", OutcomeCategory::CallBack),
            ("Interessato", OutcomeCategory::Interested),
            ("Appuntamento Fissato", OutcomeCategory::AppointmentSet),
            ("Visita programmata", OutcomeCategory::AppointmentSet),
            ("Non risponde", OutcomeCategory::NoAnswer),
            ("Occupato adesso", OutcomeCategory::NoAnswer),
            ("Assente", OutcomeCategory::NoAnswer),
            ("Non interessato", OutcomeCategory::NotInterested),
            ("Rifiuta", OutcomeCategory::NotInterested),
            ("Venduto", OutcomeCategory::Terminal),
            ("Deceduto", OutcomeCategory::Terminal),
            ("Numero errato", OutcomeCategory::Terminal),
            ("Attesa Info", OutcomeCategory::AwaitingInfo),
            ("Boh", OutcomeCategory::Other),
            ("Interessato, appuntamento fissato", OutcomeCategory::Interested),
            ("Richiamare, per ora non interessato", OutcomeCategory::CallBack),
            ("Richiamare - numero errato", OutcomeCategory::CallBack),
            ("", OutcomeCategory::Other),
        ];
        for (label, expected) in cases {
            assert_eq!(OutcomeCategory::classify(label), expected, "label {label:?}");
        }
    }

    #[test]
    fn negative_interest_wins_over_positive() {
        assert_eq!(
            OutcomeCategory::classify("NON INTERESSATO"),
            OutcomeCategory::NotInterested
        );
        assert_eq!(
            OutcomeCategory::classify("Not interested"),
            OutcomeCategory::NotInterested
        );
    }

    #[test]
    fn classification_ignores_surrounding_whitespace() {
        assert_eq!(
            OutcomeCategory::classify("  richiamare domani  "),
            OutcomeCategory::CallBack
        );
    }

    #[test]
    fn retry_and_success_sets() {
        assert!(OutcomeCategory::CallBack.is_retry());
        assert!(OutcomeCategory::NoAnswer.is_retry());
        assert!(OutcomeCategory::AwaitingInfo.is_retry());
        assert!(!OutcomeCategory::Interested.is_retry());

        assert!(OutcomeCategory::Interested.is_successful());
        assert!(OutcomeCategory::AppointmentSet.is_successful());
        assert!(!OutcomeCategory::CallBack.is_successful());
        assert!(OutcomeCategory::AppointmentSet.sets_appointment());
        assert!(!OutcomeCategory::Interested.sets_appointment());
    }
}
