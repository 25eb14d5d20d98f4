// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Card read queries.
//!
//! Every query joining `cards` to `employee_bonus_types` returns full
//! [`CardSnapshot`] values; the state filters use the exact persisted
//! lifecycle strings.

use chrono::NaiveDate;
use diesel::dsl::exists;
use diesel::prelude::*;
use perfcard::StageEntry;
use perfcard_domain::{AssessmentStatus, CardSnapshot};

use crate::data_models::{self, CardRow, StageHistoryRow, format_date};
use crate::diesel_schema::{
    card_assessments, cards, cards_approval_history, cards_stage_history, employee_bonus_types,
};
use crate::error::PersistenceError;

type CardWithKey = (CardRow, String);

fn into_snapshots(rows: Vec<CardWithKey>) -> Result<Vec<CardSnapshot>, PersistenceError> {
    rows.into_iter()
        .map(|(row, key)| row.into_snapshot(key))
        .collect()
}

/// Looks up a card by period, personnel number, and start date.
///
/// # Errors
///
/// Returns an error when the query fails or the row does not parse.
pub fn find_card(
    conn: &mut SqliteConnection,
    period_id: i64,
    per_no: &str,
    date_start: NaiveDate,
) -> Result<Option<CardSnapshot>, PersistenceError> {
    let row: Option<CardWithKey> = cards::table
        .inner_join(employee_bonus_types::table)
        .filter(cards::period_id.eq(period_id))
        .filter(cards::per_no.eq(per_no))
        .filter(cards::date_start.eq(format_date(date_start)))
        .select((CardRow::as_select(), employee_bonus_types::bonus_key))
        .first(conn)
        .optional()?;
    row.map(|(card, key)| card.into_snapshot(key)).transpose()
}

/// Loads a card by its id.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] when the card does not exist.
pub fn card_by_id(
    conn: &mut SqliteConnection,
    card_id: i64,
) -> Result<CardSnapshot, PersistenceError> {
    let (card, key): CardWithKey = cards::table
        .inner_join(employee_bonus_types::table)
        .filter(cards::card_id.eq(card_id))
        .select((CardRow::as_select(), employee_bonus_types::bonus_key))
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("card {card_id}")))?;
    card.into_snapshot(key)
}

/// Returns the employee's cards in the period in every state except
/// `Closed` and `Non-Active-Q`.
///
/// # Errors
///
/// Returns an error when the query fails or a row does not parse.
pub fn open_employee_cards(
    conn: &mut SqliteConnection,
    period_id: i64,
    per_no: &str,
) -> Result<Vec<CardSnapshot>, PersistenceError> {
    let rows: Vec<CardWithKey> = cards::table
        .inner_join(employee_bonus_types::table)
        .filter(cards::period_id.eq(period_id))
        .filter(cards::per_no.eq(per_no))
        .filter(cards::state.ne_all(vec!["Closed", "Non-Active-Q"]))
        .order(cards::card_id.asc())
        .select((CardRow::as_select(), employee_bonus_types::bonus_key))
        .load(conn)?;
    into_snapshots(rows)
}

/// Returns the unit's cards in the period in every state except
/// `Non-Active`, `Non-Active-Q`, and `Closed`.
///
/// # Errors
///
/// Returns an error when the query fails or a row does not parse.
pub fn actual_unit_cards(
    conn: &mut SqliteConnection,
    period_id: i64,
    business_unit: &str,
) -> Result<Vec<CardSnapshot>, PersistenceError> {
    let rows: Vec<CardWithKey> = cards::table
        .inner_join(employee_bonus_types::table)
        .filter(cards::period_id.eq(period_id))
        .filter(cards::business_unit.eq(business_unit))
        .filter(cards::state.ne_all(vec!["Non-Active", "Non-Active-Q", "Closed"]))
        .order(cards::card_id.asc())
        .select((CardRow::as_select(), employee_bonus_types::bonus_key))
        .load(conn)?;
    into_snapshots(rows)
}

/// Returns the ids of the employee's cards in the period whose end date
/// does not pass the cutoff.
///
/// # Errors
///
/// Returns an error when the query fails.
pub fn cards_ending_on_or_before(
    conn: &mut SqliteConnection,
    period_id: i64,
    per_no: &str,
    cutoff: NaiveDate,
) -> Result<Vec<i64>, PersistenceError> {
    // ISO text ordering matches date order.
    Ok(cards::table
        .filter(cards::period_id.eq(period_id))
        .filter(cards::per_no.eq(per_no))
        .filter(cards::date_end.le(format_date(cutoff)))
        .select(cards::card_id)
        .load(conn)?)
}

/// Reads the status of the card's assessment.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] when the card has no assessment
/// row.
pub fn assessment_status(
    conn: &mut SqliteConnection,
    card_id: i64,
) -> Result<AssessmentStatus, PersistenceError> {
    let raw: String = card_assessments::table
        .filter(card_assessments::card_id.eq(card_id))
        .select(card_assessments::assessment_status)
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("assessment of card {card_id}")))?;
    data_models::parse_stored::<AssessmentStatus>(&raw)
}

/// Returns the card's most recently started stage-history entry.
///
/// # Errors
///
/// Returns an error when the query fails or the entry does not parse.
pub fn last_stage_entry(
    conn: &mut SqliteConnection,
    card_id: i64,
) -> Result<Option<StageEntry>, PersistenceError> {
    let row: Option<StageHistoryRow> = cards_stage_history::table
        .filter(cards_stage_history::card_id.eq(card_id))
        .order((
            cards_stage_history::start_dt.desc(),
            cards_stage_history::entry_id.desc(),
        ))
        .select(StageHistoryRow::as_select())
        .first(conn)
        .optional()?;
    row.map(StageHistoryRow::into_entry).transpose()
}

/// Returns whether a bonus type with the given key exists.
///
/// # Errors
///
/// Returns an error when the query fails.
pub fn has_bonus_type(conn: &mut SqliteConnection, key: &str) -> Result<bool, PersistenceError> {
    Ok(diesel::select(exists(
        employee_bonus_types::table.filter(employee_bonus_types::bonus_key.eq(key)),
    ))
    .get_result(conn)?)
}

/// Counts the card's approval-history entries.
///
/// # Errors
///
/// Returns an error when the query fails.
pub fn approval_entry_count(
    conn: &mut SqliteConnection,
    card_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(cards_approval_history::table
        .filter(cards_approval_history::card_id.eq(card_id))
        .count()
        .get_result(conn)?)
}
