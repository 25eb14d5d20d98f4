// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation and parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Card state string is not recognized.
    InvalidCardState(String),
    /// Card status string is not recognized.
    InvalidCardStatus(String),
    /// Card stage string is not recognized.
    InvalidCardStage(String),
    /// Assessment status string is not recognized.
    InvalidAssessmentStatus(String),
    /// Period kind string is not recognized.
    InvalidPeriodKind(String),
    /// Employee status code is not recognized.
    InvalidEmployeeStatus(String),
    /// Period dates are inconsistent.
    InvalidPeriod {
        /// Description of the validation failure.
        reason: String,
    },
    /// Failed to parse a date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCardState(s) => write!(f, "Invalid card state: {s}"),
            Self::InvalidCardStatus(s) => write!(f, "Invalid card status: {s}"),
            Self::InvalidCardStage(s) => write!(f, "Invalid card stage: {s}"),
            Self::InvalidAssessmentStatus(s) => write!(f, "Invalid assessment status: {s}"),
            Self::InvalidPeriodKind(s) => write!(f, "Invalid period kind: {s}"),
            Self::InvalidEmployeeStatus(s) => write!(f, "Invalid employee status: {s}"),
            Self::InvalidPeriod { reason } => write!(f, "Invalid period: {reason}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
