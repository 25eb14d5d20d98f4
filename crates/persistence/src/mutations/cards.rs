// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Card write operations.
//!
//! ## Invariants
//!
//! - Every card row owns exactly one assessment row; `create_card` writes
//!   both inside one transaction.
//! - Updates touching a missing card report `NotFound` instead of silently
//!   affecting zero rows.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use perfcard::NewCard;
use perfcard_domain::{AssessmentStatus, CardStage, CardState, CardStatus};

use crate::data_models::{
    NewApprovalHistoryRow, NewAssessmentRow, NewCardRow, NewStageHistoryRow, format_date,
    format_datetime,
};
use crate::diesel_schema::{card_assessments, cards, cards_approval_history, cards_stage_history};
use crate::error::PersistenceError;
use crate::queries::periods::bonus_type_id;
use crate::sqlite::get_last_insert_rowid;

fn affected_card(rows: usize, card_id: i64) -> Result<(), PersistenceError> {
    if rows == 0 {
        return Err(PersistenceError::NotFound(format!("card {card_id}")));
    }
    Ok(())
}

/// Creates a card with lifecycle defaults plus its assessment row, and
/// returns the card id.
///
/// # Errors
///
/// Returns `NotFound` when the bonus type key is unknown, and
/// `ConstraintViolation` when the card's natural key already exists.
pub fn create_card(conn: &mut SqliteConnection, card: &NewCard) -> Result<i64, PersistenceError> {
    conn.transaction(|conn| {
        let bonus_type: i64 = bonus_type_id(conn, &card.bonus_type_key)?.ok_or_else(|| {
            PersistenceError::NotFound(format!("bonus type '{}'", card.bonus_type_key))
        })?;

        let row = NewCardRow {
            per_no: card.per_no.clone(),
            business_unit: card.business_unit.clone(),
            period_id: card.period_id,
            bonus_type_id: bonus_type,
            date_start: format_date(card.date_start),
            date_end: format_date(card.date_end),
            generation_task_id: Some(card.generation_task_id.to_string()),
        };
        diesel::insert_into(cards::table).values(&row).execute(conn)?;
        let card_id: i64 = get_last_insert_rowid(conn)?;

        let assessment = NewAssessmentRow {
            card_id,
            assessment_status: AssessmentStatus::NotStarted.as_str(),
        };
        diesel::insert_into(card_assessments::table)
            .values(&assessment)
            .execute(conn)?;
        Ok(card_id)
    })
}

/// Rewrites a card's resolved end date, bonus type, and business unit.
///
/// # Errors
///
/// Returns `NotFound` when the card or the bonus type key does not exist.
pub fn update_card_resolution(
    conn: &mut SqliteConnection,
    card_id: i64,
    date_end: NaiveDate,
    bonus_type_key: &str,
    business_unit: &str,
) -> Result<(), PersistenceError> {
    let bonus_type: i64 = bonus_type_id(conn, bonus_type_key)?
        .ok_or_else(|| PersistenceError::NotFound(format!("bonus type '{bonus_type_key}'")))?;
    let rows: usize = diesel::update(cards::table.filter(cards::card_id.eq(card_id)))
        .set((
            cards::date_end.eq(format_date(date_end)),
            cards::bonus_type_id.eq(bonus_type),
            cards::business_unit.eq(business_unit),
        ))
        .execute(conn)?;
    affected_card(rows, card_id)
}

/// Sets a card's lifecycle state.
///
/// # Errors
///
/// Returns `NotFound` when the card does not exist.
pub fn update_card_state(
    conn: &mut SqliteConnection,
    card_id: i64,
    state: CardState,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(cards::table.filter(cards::card_id.eq(card_id)))
        .set(cards::state.eq(state.as_str()))
        .execute(conn)?;
    affected_card(rows, card_id)
}

/// Sets a card's lifecycle state and workflow status together.
///
/// # Errors
///
/// Returns `NotFound` when the card does not exist.
pub fn update_card_state_status(
    conn: &mut SqliteConnection,
    card_id: i64,
    state: CardState,
    status: CardStatus,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(cards::table.filter(cards::card_id.eq(card_id)))
        .set((
            cards::state.eq(state.as_str()),
            cards::status.eq(status.as_str()),
        ))
        .execute(conn)?;
    affected_card(rows, card_id)
}

/// Sets a card's lifecycle state and end date together.
///
/// # Errors
///
/// Returns `NotFound` when the card does not exist.
pub fn update_card_deactivation(
    conn: &mut SqliteConnection,
    card_id: i64,
    state: CardState,
    date_end: NaiveDate,
) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(cards::table.filter(cards::card_id.eq(card_id)))
        .set((
            cards::state.eq(state.as_str()),
            cards::date_end.eq(format_date(date_end)),
        ))
        .execute(conn)?;
    affected_card(rows, card_id)
}

/// Sets the status of the card's assessment.
///
/// # Errors
///
/// Returns `NotFound` when the card has no assessment row.
pub fn set_assessment_status(
    conn: &mut SqliteConnection,
    card_id: i64,
    status: AssessmentStatus,
) -> Result<(), PersistenceError> {
    let rows: usize =
        diesel::update(card_assessments::table.filter(card_assessments::card_id.eq(card_id)))
            .set(card_assessments::assessment_status.eq(status.as_str()))
            .execute(conn)?;
    if rows == 0 {
        return Err(PersistenceError::NotFound(format!(
            "assessment of card {card_id}"
        )));
    }
    Ok(())
}

/// Deletes the card's approval history.
///
/// Deleting an empty history is not an error.
///
/// # Errors
///
/// Returns an error when the delete fails.
pub fn purge_approval_history(
    conn: &mut SqliteConnection,
    card_id: i64,
) -> Result<(), PersistenceError> {
    diesel::delete(cards_approval_history::table.filter(cards_approval_history::card_id.eq(card_id)))
        .execute(conn)?;
    Ok(())
}

/// Appends a stage-history entry for the card.
///
/// # Errors
///
/// Returns an error when the insert fails.
pub fn add_stage_entry(
    conn: &mut SqliteConnection,
    card_id: i64,
    stage: CardStage,
    started_at: NaiveDateTime,
    ended_at: Option<NaiveDateTime>,
) -> Result<(), PersistenceError> {
    let row = NewStageHistoryRow {
        card_id,
        stage: stage.as_str().to_string(),
        start_dt: format_datetime(started_at),
        end_dt: ended_at.map(format_datetime),
    };
    diesel::insert_into(cards_stage_history::table)
        .values(&row)
        .execute(conn)?;
    Ok(())
}

/// Appends an approval-history entry for the card.
///
/// # Errors
///
/// Returns an error when the insert fails.
pub fn add_approval_entry(
    conn: &mut SqliteConnection,
    card_id: i64,
    approver: &str,
    decision: &str,
    decided_at: NaiveDateTime,
) -> Result<(), PersistenceError> {
    let row = NewApprovalHistoryRow {
        card_id,
        approver: approver.to_string(),
        decision: decision.to_string(),
        decided_at: format_datetime(decided_at),
    };
    diesel::insert_into(cards_approval_history::table)
        .values(&row)
        .execute(conn)?;
    Ok(())
}
