// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs bridging the Diesel schema and the domain types.
//!
//! Dates travel as ISO-8601 text and lifecycle fields as their persisted
//! string representations; the conversion helpers here parse them back
//! into domain types and reject anything the domain does not recognize.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use perfcard::StageEntry;
use perfcard_domain::{
    CardSnapshot, CardStage, CardState, CardStatus, Period, PeriodKind,
};
use uuid::Uuid;

use crate::diesel_schema::{
    card_assessments, cards, cards_approval_history, cards_stage_history, employee_bonus_types,
    period_bonus_types, periods,
};
use crate::error::PersistenceError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, PersistenceError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| PersistenceError::InvalidStoredValue(format!("date '{raw}': {e}")))
}

pub(crate) fn parse_datetime(raw: &str) -> Result<NaiveDateTime, PersistenceError> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .map_err(|e| PersistenceError::InvalidStoredValue(format!("datetime '{raw}': {e}")))
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_datetime(datetime: NaiveDateTime) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}

pub(crate) fn parse_stored<T>(raw: &str) -> Result<T, PersistenceError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| PersistenceError::InvalidStoredValue(format!("'{raw}': {e}")))
}

/// A persisted period row, without its bonus type keys.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = periods)]
pub struct PeriodRow {
    pub period_id: i64,
    pub name: String,
    pub period_kind: String,
    pub date_start: String,
    pub date_end: String,
    pub generation_end_date: String,
    pub assessment_end_date: String,
    pub bonus_payout_date: String,
}

impl PeriodRow {
    /// Converts this row into a domain [`Period`].
    ///
    /// # Errors
    ///
    /// Returns an error when a stored date or the period kind does not
    /// parse.
    pub fn into_period(self, bonus_type_keys: Vec<String>) -> Result<Period, PersistenceError> {
        Ok(Period {
            id: self.period_id,
            name: self.name,
            kind: parse_stored::<PeriodKind>(&self.period_kind)?,
            date_start: parse_date(&self.date_start)?,
            date_end: parse_date(&self.date_end)?,
            generation_end_date: parse_date(&self.generation_end_date)?,
            assessment_end_date: parse_date(&self.assessment_end_date)?,
            bonus_payout_date: parse_date(&self.bonus_payout_date)?,
            bonus_type_keys,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = periods)]
pub struct NewPeriodRow {
    pub period_id: i64,
    pub name: String,
    pub period_kind: String,
    pub date_start: String,
    pub date_end: String,
    pub generation_end_date: String,
    pub assessment_end_date: String,
    pub bonus_payout_date: String,
}

impl NewPeriodRow {
    #[must_use]
    pub fn from_period(period: &Period) -> Self {
        Self {
            period_id: period.id,
            name: period.name.clone(),
            period_kind: period.kind.as_str().to_string(),
            date_start: format_date(period.date_start),
            date_end: format_date(period.date_end),
            generation_end_date: format_date(period.generation_end_date),
            assessment_end_date: format_date(period.assessment_end_date),
            bonus_payout_date: format_date(period.bonus_payout_date),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = employee_bonus_types)]
pub struct NewBonusTypeRow<'a> {
    pub bonus_key: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = period_bonus_types)]
pub struct NewPeriodBonusTypeRow {
    pub period_id: i64,
    pub bonus_type_id: i64,
}

/// A persisted card row, without its bonus type key.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cards)]
pub struct CardRow {
    pub card_id: i64,
    pub per_no: String,
    pub business_unit: String,
    pub period_id: i64,
    pub bonus_type_id: i64,
    pub date_start: String,
    pub date_end: String,
    pub state: String,
    pub status: String,
    pub stage: String,
    pub generation_task_id: Option<String>,
}

impl CardRow {
    /// Converts this row and its joined bonus type key into a
    /// [`CardSnapshot`].
    ///
    /// # Errors
    ///
    /// Returns an error when a stored date, lifecycle field, or task id
    /// does not parse.
    pub fn into_snapshot(self, bonus_type_key: String) -> Result<CardSnapshot, PersistenceError> {
        let generation_task_id: Option<Uuid> = match self.generation_task_id {
            Some(raw) => Some(Uuid::parse_str(&raw).map_err(|e| {
                PersistenceError::InvalidStoredValue(format!("task id '{raw}': {e}"))
            })?),
            None => None,
        };
        Ok(CardSnapshot {
            id: self.card_id,
            per_no: self.per_no,
            business_unit: self.business_unit,
            period_id: self.period_id,
            date_start: parse_date(&self.date_start)?,
            date_end: parse_date(&self.date_end)?,
            state: parse_stored::<CardState>(&self.state)?,
            status: parse_stored::<CardStatus>(&self.status)?,
            stage: parse_stored::<CardStage>(&self.stage)?,
            bonus_type_key,
            generation_task_id,
        })
    }
}

/// Insertable card row; lifecycle columns fall back to their schema
/// defaults.
#[derive(Debug, Insertable)]
#[diesel(table_name = cards)]
pub struct NewCardRow {
    pub per_no: String,
    pub business_unit: String,
    pub period_id: i64,
    pub bonus_type_id: i64,
    pub date_start: String,
    pub date_end: String,
    pub generation_task_id: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = card_assessments)]
pub struct NewAssessmentRow<'a> {
    pub card_id: i64,
    pub assessment_status: &'a str,
}

/// A persisted stage-history entry.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cards_stage_history)]
pub struct StageHistoryRow {
    pub entry_id: i64,
    pub card_id: i64,
    pub stage: String,
    pub start_dt: String,
    pub end_dt: Option<String>,
}

impl StageHistoryRow {
    /// Converts this row into a [`StageEntry`].
    ///
    /// # Errors
    ///
    /// Returns an error when the stage or a timestamp does not parse.
    pub fn into_entry(self) -> Result<StageEntry, PersistenceError> {
        Ok(StageEntry {
            stage: parse_stored::<CardStage>(&self.stage)?,
            started_at: parse_datetime(&self.start_dt)?,
            ended_at: self.end_dt.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cards_stage_history)]
pub struct NewStageHistoryRow {
    pub card_id: i64,
    pub stage: String,
    pub start_dt: String,
    pub end_dt: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cards_approval_history)]
pub struct NewApprovalHistoryRow {
    pub card_id: i64,
    pub approver: String,
    pub decision: String,
    pub decided_at: String,
}
