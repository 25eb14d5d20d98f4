// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Core entities of the performance-card data model.
//!
//! ## Invariants
//!
//! - A period's `date_start` precedes `date_end`, and card generation closes
//!   no later than the period end.
//! - Card lifecycle strings round-trip through `as_str`/`FromStr` unchanged;
//!   these are the exact values persisted by the store.

use crate::error::DomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle state of a performance card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CardState {
    /// Card is live and participates in the current period.
    #[default]
    Active,
    /// Card was deactivated by a regular assignment change.
    NonActive,
    /// Card is temporarily suspended.
    Frozen,
    /// Card is finished; never reopened by generation.
    Closed,
    /// Card was deactivated because the employee quit for good.
    NonActiveQuit,
}

impl FromStr for CardState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Non-Active" => Ok(Self::NonActive),
            "Frozen" => Ok(Self::Frozen),
            "Closed" => Ok(Self::Closed),
            "Non-Active-Q" => Ok(Self::NonActiveQuit),
            _ => Err(DomainError::InvalidCardState(s.to_string())),
        }
    }
}

impl std::fmt::Display for CardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl CardState {
    /// Converts this state to its persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::NonActive => "Non-Active",
            Self::Frozen => "Frozen",
            Self::Closed => "Closed",
            Self::NonActiveQuit => "Non-Active-Q",
        }
    }

    /// Returns whether the card was switched off by deactivation.
    #[must_use]
    pub const fn is_deactivated(&self) -> bool {
        matches!(self, Self::NonActive | Self::NonActiveQuit)
    }

    /// Returns whether generation may still touch this card.
    ///
    /// Closed cards and cards deactivated by a final quit are never
    /// candidates for employee-level deactivation.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed | Self::NonActiveQuit)
    }

    /// Returns whether the card counts as actual for unit-level checks.
    #[must_use]
    pub const fn is_actual(&self) -> bool {
        !self.is_deactivated()
    }
}

/// Workflow status of a performance card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CardStatus {
    /// Card row exists but work has not begun.
    Created,
    /// Stage has not started.
    NotStarted,
    /// Stage is in progress.
    InWork,
    /// Employee familiarization step.
    Familiarization,
    /// Agreement chain in progress.
    Agreement,
    /// Agreement chain finished with approval.
    Approved,
    /// System-owned transitional status.
    #[default]
    IsProcessed,
}

impl FromStr for CardStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "Not started" => Ok(Self::NotStarted),
            "In work" => Ok(Self::InWork),
            "Familiarization" => Ok(Self::Familiarization),
            "Agreement" => Ok(Self::Agreement),
            "Approved" => Ok(Self::Approved),
            "Is processed" => Ok(Self::IsProcessed),
            _ => Err(DomainError::InvalidCardStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl CardStatus {
    /// Converts this status to its persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::NotStarted => "Not started",
            Self::InWork => "In work",
            Self::Familiarization => "Familiarization",
            Self::Agreement => "Agreement",
            Self::Approved => "Approved",
            Self::IsProcessed => "Is processed",
        }
    }
}

/// Stage of the card workflow the card currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CardStage {
    /// Objectives are being set.
    #[default]
    OnSetting,
    /// Objectives are being adjusted mid-period.
    OnActualization,
    /// Results are being assessed.
    OnAssessment,
}

impl FromStr for CardStage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_setting" => Ok(Self::OnSetting),
            "on_actualization" => Ok(Self::OnActualization),
            "on_assessment" => Ok(Self::OnAssessment),
            _ => Err(DomainError::InvalidCardStage(s.to_string())),
        }
    }
}

impl std::fmt::Display for CardStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl CardStage {
    /// Converts this stage to its persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OnSetting => "on_setting",
            Self::OnActualization => "on_actualization",
            Self::OnAssessment => "on_assessment",
        }
    }
}

/// Status of the assessment attached to a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AssessmentStatus {
    /// Assessment has not started.
    #[default]
    NotStarted,
    /// Assessment is being filled in.
    InProgress,
    /// Assessment awaits manager approval.
    OnApprovement,
    /// Assessment is approved.
    Approved,
    /// System-owned transitional status.
    IsProcessed,
}

impl FromStr for AssessmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NotStarted" => Ok(Self::NotStarted),
            "InProgress" => Ok(Self::InProgress),
            "OnApprovement" => Ok(Self::OnApprovement),
            "Approved" => Ok(Self::Approved),
            "IsProcessed" => Ok(Self::IsProcessed),
            _ => Err(DomainError::InvalidAssessmentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AssessmentStatus {
    /// Converts this status to its persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::InProgress => "InProgress",
            Self::OnApprovement => "OnApprovement",
            Self::Approved => "Approved",
            Self::IsProcessed => "IsProcessed",
        }
    }
}

/// Granularity of a bonus period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKind {
    /// Calendar year.
    Year,
    /// Half of a calendar year.
    HalfYear,
    /// Calendar quarter.
    Quarter,
    /// Calendar month.
    Month,
}

impl FromStr for PeriodKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Year" => Ok(Self::Year),
            "HalfYear" => Ok(Self::HalfYear),
            "Quarter" => Ok(Self::Quarter),
            "Month" => Ok(Self::Month),
            _ => Err(DomainError::InvalidPeriodKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PeriodKind {
    /// Converts this kind to its persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::HalfYear => "HalfYear",
            Self::Quarter => "Quarter",
            Self::Month => "Month",
        }
    }
}

/// HR employment status of a position record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeStatus {
    /// Employee holds the position.
    Active,
    /// Employee left the position.
    Fired,
}

impl EmployeeStatus {
    /// Returns the HR feed code for this status.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Active => "3",
            Self::Fired => "0",
        }
    }

    /// Parses an HR feed status code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmployeeStatus` for unknown codes.
    pub fn from_code(code: &str) -> Result<Self, DomainError> {
        match code {
            "3" => Ok(Self::Active),
            "0" => Ok(Self::Fired),
            _ => Err(DomainError::InvalidEmployeeStatus(code.to_string())),
        }
    }
}

/// A bonus period for which cards are generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    /// Store identifier of the period.
    pub id: i64,
    /// Human-readable name, e.g. "2022 H2".
    pub name: String,
    /// Granularity of the period.
    pub kind: PeriodKind,
    /// First day of the period.
    pub date_start: NaiveDate,
    /// Last day of the period.
    pub date_end: NaiveDate,
    /// Last day on which cards may still be generated for this period.
    pub generation_end_date: NaiveDate,
    /// Last day of the assessment phase.
    pub assessment_end_date: NaiveDate,
    /// Day the bonus for this period is paid out.
    pub bonus_payout_date: NaiveDate,
    /// Bonus type keys attached to this period.
    pub bonus_type_keys: Vec<String>,
}

impl Period {
    /// Validates the period's date consistency.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPeriod` when `date_start` is not before
    /// `date_end` or when `generation_end_date` falls after `date_end`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.date_start >= self.date_end {
            return Err(DomainError::InvalidPeriod {
                reason: format!(
                    "date_start {} must precede date_end {}",
                    self.date_start, self.date_end
                ),
            });
        }
        if self.generation_end_date > self.date_end {
            return Err(DomainError::InvalidPeriod {
                reason: format!(
                    "generation_end_date {} must not exceed date_end {}",
                    self.generation_end_date, self.date_end
                ),
            });
        }
        Ok(())
    }

    /// Returns the period's `[date_start, date_end]` interval.
    #[must_use]
    pub const fn interval(&self) -> (NaiveDate, NaiveDate) {
        (self.date_start, self.date_end)
    }
}

/// A contiguous stretch of days with one bonus type and one business unit.
///
/// Also serves as the resolved card window handed to the existence resolver:
/// `start`/`end` are the card dates after clipping to the period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusPeriod {
    /// First day of the stretch.
    pub start: NaiveDate,
    /// Last day of the stretch.
    pub end: NaiveDate,
    /// Bonus type key in force during the stretch.
    pub bonus_type: String,
    /// Deepest business unit of the record that produced the stretch.
    pub business_unit: String,
}

/// A detected final-quit event for an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuitEvent {
    /// Day the deactivation takes effect (period end clamped to fire date).
    pub effective_date: NaiveDate,
    /// State the employee's cards are moved to.
    pub target_state: CardState,
}

/// In-memory view of a persisted card, as read by the generation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSnapshot {
    /// Store identifier of the card.
    pub id: i64,
    /// Personnel number of the card holder.
    pub per_no: String,
    /// Business unit the card belongs to.
    pub business_unit: String,
    /// Period the card belongs to.
    pub period_id: i64,
    /// First day the card covers.
    pub date_start: NaiveDate,
    /// Last day the card covers.
    pub date_end: NaiveDate,
    /// Lifecycle state.
    pub state: CardState,
    /// Workflow status.
    pub status: CardStatus,
    /// Workflow stage.
    pub stage: CardStage,
    /// Bonus type key recorded on the card.
    pub bonus_type_key: String,
    /// Generation run that last created or claimed this card.
    pub generation_task_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn card_state_round_trips_through_strings() {
        for state in [
            CardState::Active,
            CardState::NonActive,
            CardState::Frozen,
            CardState::Closed,
            CardState::NonActiveQuit,
        ] {
            let parsed: CardState = state.as_str().parse().unwrap();
            assert_eq!(parsed, state);
        }
        assert!("NonActive".parse::<CardState>().is_err());
    }

    #[test]
    fn quit_deactivated_cards_are_not_open() {
        assert!(CardState::Active.is_open());
        assert!(CardState::NonActive.is_open());
        assert!(CardState::Frozen.is_open());
        assert!(!CardState::Closed.is_open());
        assert!(!CardState::NonActiveQuit.is_open());
    }

    #[test]
    fn deactivated_states_are_not_actual() {
        assert!(CardState::Active.is_actual());
        assert!(CardState::Closed.is_actual());
        assert!(!CardState::NonActive.is_actual());
        assert!(!CardState::NonActiveQuit.is_actual());
    }

    #[test]
    fn period_rejects_inverted_dates() {
        let period = Period {
            id: 1,
            name: "2022 H2".to_string(),
            kind: PeriodKind::HalfYear,
            date_start: d(2022, 12, 31),
            date_end: d(2022, 7, 1),
            generation_end_date: d(2022, 10, 1),
            assessment_end_date: d(2023, 2, 1),
            bonus_payout_date: d(2023, 3, 10),
            bonus_type_keys: vec!["9GA1".to_string()],
        };
        assert!(period.validate().is_err());
    }

    #[test]
    fn period_rejects_generation_cutoff_past_end() {
        let period = Period {
            id: 1,
            name: "2022 H2".to_string(),
            kind: PeriodKind::HalfYear,
            date_start: d(2022, 7, 1),
            date_end: d(2022, 12, 31),
            generation_end_date: d(2023, 1, 15),
            assessment_end_date: d(2023, 2, 1),
            bonus_payout_date: d(2023, 3, 10),
            bonus_type_keys: vec!["9GA1".to_string()],
        };
        assert!(period.validate().is_err());
    }
}
