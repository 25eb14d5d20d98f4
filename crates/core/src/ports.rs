// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborator ports of the generation engine.
//!
//! The engine talks to three externals: the card store, the workflow
//! engine, and the HR system. Each is a trait so the engine stays pure and
//! testable; production implementations live in their own crates.

use chrono::{NaiveDate, NaiveDateTime};
use perfcard_domain::{
    AssessmentStatus, CardSnapshot, CardStage, CardState, CardStatus, Employee, Period,
};
use uuid::Uuid;

/// Errors surfaced by a [`CardStore`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A query failed.
    QueryFailed(String),
    /// A referenced row does not exist.
    NotFound(String),
    /// A write violated a database constraint.
    ConstraintViolation(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QueryFailed(msg) => write!(f, "Store query failed: {msg}"),
            Self::NotFound(msg) => write!(f, "Store row not found: {msg}"),
            Self::ConstraintViolation(msg) => write!(f, "Store constraint violated: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors surfaced by a [`WorkflowEngine`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine could not be reached.
    Transport(String),
    /// The engine answered with a non-success status.
    Rejected {
        /// HTTP status code of the rejection.
        status: u16,
        /// Response body, for the log.
        body: String,
    },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "Workflow engine unreachable: {msg}"),
            Self::Rejected { status, body } => {
                write!(f, "Workflow engine rejected the request: {status} | {body}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Errors surfaced by an [`HrProvider`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HrError {
    /// The HR system could not be reached.
    Unavailable(String),
    /// The HR system returned data the record model rejects.
    Malformed(String),
}

impl std::fmt::Display for HrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "HR system unavailable: {msg}"),
            Self::Malformed(msg) => write!(f, "HR data malformed: {msg}"),
        }
    }
}

impl std::error::Error for HrError {}

/// Field values for a card about to be created.
///
/// The store fills in the lifecycle defaults: state `Active`, status
/// `Is processed`, stage `on_setting`, and a fresh assessment in
/// `NotStarted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    /// Personnel number of the card holder.
    pub per_no: String,
    /// Business unit the card belongs to.
    pub business_unit: String,
    /// Bonus type key; must reference a known bonus type.
    pub bonus_type_key: String,
    /// Period the card belongs to.
    pub period_id: i64,
    /// First day the card covers.
    pub date_start: NaiveDate,
    /// Last day the card covers.
    pub date_end: NaiveDate,
    /// Generation run creating the card.
    pub generation_task_id: Uuid,
}

/// One entry of a card's stage history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageEntry {
    /// Stage the entry records.
    pub stage: CardStage,
    /// When the stage started.
    pub started_at: NaiveDateTime,
    /// When the stage ended; `None` while the stage is still running.
    pub ended_at: Option<NaiveDateTime>,
}

/// Persistent card storage as seen by the generation engine.
pub trait CardStore {
    /// Looks up a card by its period, personnel number, and start date.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the query fails.
    fn find_card(
        &mut self,
        period_id: i64,
        per_no: &str,
        date_start: NaiveDate,
    ) -> Result<Option<CardSnapshot>, StoreError>;

    /// Creates a card with lifecycle defaults and returns its id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the write fails, including natural-key
    /// constraint violations.
    fn create_card(&mut self, card: &NewCard) -> Result<i64, StoreError>;

    /// Rewrites a card's resolved end date, bonus type, and business unit.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the write fails.
    fn update_card_resolution(
        &mut self,
        card_id: i64,
        date_end: NaiveDate,
        bonus_type_key: &str,
        business_unit: &str,
    ) -> Result<(), StoreError>;

    /// Sets a card's lifecycle state.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the write fails.
    fn update_card_state(&mut self, card_id: i64, state: CardState) -> Result<(), StoreError>;

    /// Sets a card's lifecycle state and workflow status together.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the write fails.
    fn update_card_state_status(
        &mut self,
        card_id: i64,
        state: CardState,
        status: CardStatus,
    ) -> Result<(), StoreError>;

    /// Sets a card's lifecycle state and end date together.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the write fails.
    fn update_card_deactivation(
        &mut self,
        card_id: i64,
        state: CardState,
        date_end: NaiveDate,
    ) -> Result<(), StoreError>;

    /// Reads the status of the card's assessment.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the query fails or the card has no
    /// assessment row.
    fn assessment_status(&mut self, card_id: i64) -> Result<AssessmentStatus, StoreError>;

    /// Sets the status of the card's assessment.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the write fails.
    fn set_assessment_status(
        &mut self,
        card_id: i64,
        status: AssessmentStatus,
    ) -> Result<(), StoreError>;

    /// Returns the card's most recently started stage-history entry.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the query fails.
    fn last_stage_entry(&mut self, card_id: i64) -> Result<Option<StageEntry>, StoreError>;

    /// Deletes the card's approval history.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the write fails.
    fn purge_approval_history(&mut self, card_id: i64) -> Result<(), StoreError>;

    /// Returns the employee's cards in the period that are still open to
    /// deactivation: every state except `Closed` and `Non-Active-Q`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the query fails.
    fn open_employee_cards(
        &mut self,
        period_id: i64,
        per_no: &str,
    ) -> Result<Vec<CardSnapshot>, StoreError>;

    /// Returns the unit's cards in the period that are actual and not
    /// closed: every state except `Non-Active`, `Non-Active-Q`, and
    /// `Closed`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the query fails.
    fn actual_unit_cards(
        &mut self,
        period_id: i64,
        business_unit: &str,
    ) -> Result<Vec<CardSnapshot>, StoreError>;

    /// Returns the ids of the employee's cards in the period whose end date
    /// does not pass the cutoff.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the query fails.
    fn cards_ending_on_or_before(
        &mut self,
        period_id: i64,
        per_no: &str,
        cutoff: NaiveDate,
    ) -> Result<Vec<i64>, StoreError>;

    /// Returns whether a bonus type with the given key exists.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the query fails.
    fn has_bonus_type(&mut self, key: &str) -> Result<bool, StoreError>;
}

/// Outbound interface to the external workflow engine.
pub trait WorkflowEngine {
    /// Delivers a message correlated by business key.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine is unreachable or rejects
    /// the message.
    fn send_message(&self, business_key: &str, message_name: &str) -> Result<(), EngineError>;

    /// Starts a process instance under the given business key.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine is unreachable or rejects
    /// the start.
    fn start_process(&self, process_key: &str, business_key: &str) -> Result<(), EngineError>;
}

/// Inbound interface to the HR system.
pub trait HrProvider {
    /// Fetches the employees of a business unit with their assignment
    /// histories, pre-filtered to the period's bonus types.
    ///
    /// # Errors
    ///
    /// Returns an [`HrError`] when the HR system is unreachable or delivers
    /// malformed data.
    fn employees_by_unit(
        &self,
        business_unit: &str,
        period: &Period,
        bonus_type_keys: &[String],
    ) -> Result<Vec<Employee>, HrError>;
}

/// Business key of the card's agreement process.
#[must_use]
pub fn agreement_business_key(card_id: i64) -> String {
    format!("cardAgreement_{card_id}")
}

/// Name of the deactivation message for a card.
#[must_use]
pub fn deactivate_message_name(card_id: i64) -> String {
    format!("CardDeactivate-{card_id}")
}

/// Process-definition key resumed when reactivating a card in the given
/// stage.
#[must_use]
pub const fn stage_process_key(stage: CardStage) -> &'static str {
    match stage {
        CardStage::OnSetting => "cardSetting",
        CardStage::OnActualization => "cardActualization",
        CardStage::OnAssessment => "cardAssessment",
    }
}
