// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! Diesel-backed card store.
//!
//! [`Persistence`] wraps a `SQLite` connection and implements the
//! [`CardStore`] port of the generation engine. Queries and mutations are
//! backend-agnostic Diesel DSL; everything SQLite-specific sits in
//! [`sqlite`].
//!
//! ## Invariants
//!
//! - Every card row owns exactly one assessment row.
//! - Lifecycle columns hold the exact strings produced by the domain
//!   enums' `as_str`.

pub mod data_models;
pub mod diesel_schema;
pub mod error;
pub mod mutations;
pub mod queries;
pub mod sqlite;

#[cfg(test)]
mod tests;

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{NaiveDate, NaiveDateTime};
use diesel::SqliteConnection;
use perfcard::{CardStore, NewCard, StageEntry, StoreError};
use perfcard_domain::{
    AssessmentStatus, CardSnapshot, CardStage, CardState, CardStatus, Period,
};

use crate::error::PersistenceError;

/// Counter for unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// The Diesel-backed card store.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a store backed by a fresh in-memory database with migrations
    /// applied.
    ///
    /// Each call gets its own shared-cache database, so parallel tests do
    /// not observe each other.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection or a migration fails.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let database_url: String = format!("file:memdb_card_{db_id}?mode=memory&cache=shared");
        let mut conn: SqliteConnection = sqlite::initialize_database(&database_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;
        Ok(Self { conn })
    }

    /// Creates a store backed by a file database with migrations applied
    /// and WAL mode enabled.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection, a migration, or a PRAGMA
    /// fails.
    pub fn new_with_file(path: &str) -> Result<Self, PersistenceError> {
        let mut conn: SqliteConnection = sqlite::initialize_database(path)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;
        sqlite::enable_wal_mode(&mut conn)?;
        Ok(Self { conn })
    }

    /// Exposes the raw connection, mainly for tests and migrations
    /// tooling.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Creates a bonus type and returns its row id.
    ///
    /// # Errors
    ///
    /// Returns an error when the key already exists or the write fails.
    pub fn create_bonus_type(&mut self, key: &str, name: &str) -> Result<i64, PersistenceError> {
        mutations::periods::create_bonus_type(&mut self.conn, key, name)
    }

    /// Creates a period and attaches its bonus type keys.
    ///
    /// # Errors
    ///
    /// Returns an error when a key is unknown or the write fails.
    pub fn create_period(&mut self, period: &Period) -> Result<i64, PersistenceError> {
        mutations::periods::create_period(&mut self.conn, period)
    }

    /// Loads a period with its bonus type keys.
    ///
    /// # Errors
    ///
    /// Returns an error when the period does not exist.
    pub fn load_period(&mut self, period_id: i64) -> Result<Period, PersistenceError> {
        queries::periods::load_period(&mut self.conn, period_id)
    }

    /// Loads a card by its id.
    ///
    /// # Errors
    ///
    /// Returns an error when the card does not exist.
    pub fn card(&mut self, card_id: i64) -> Result<CardSnapshot, PersistenceError> {
        queries::cards::card_by_id(&mut self.conn, card_id)
    }

    /// Appends a stage-history entry for a card.
    ///
    /// # Errors
    ///
    /// Returns an error when the insert fails.
    pub fn add_stage_entry(
        &mut self,
        card_id: i64,
        stage: CardStage,
        started_at: NaiveDateTime,
        ended_at: Option<NaiveDateTime>,
    ) -> Result<(), PersistenceError> {
        mutations::cards::add_stage_entry(&mut self.conn, card_id, stage, started_at, ended_at)
    }

    /// Appends an approval-history entry for a card.
    ///
    /// # Errors
    ///
    /// Returns an error when the insert fails.
    pub fn add_approval_entry(
        &mut self,
        card_id: i64,
        approver: &str,
        decision: &str,
        decided_at: NaiveDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::cards::add_approval_entry(&mut self.conn, card_id, approver, decision, decided_at)
    }

    /// Counts a card's approval-history entries.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails.
    pub fn approval_entry_count(&mut self, card_id: i64) -> Result<i64, PersistenceError> {
        queries::cards::approval_entry_count(&mut self.conn, card_id)
    }
}

impl CardStore for Persistence {
    fn find_card(
        &mut self,
        period_id: i64,
        per_no: &str,
        date_start: NaiveDate,
    ) -> Result<Option<CardSnapshot>, StoreError> {
        Ok(queries::cards::find_card(
            &mut self.conn,
            period_id,
            per_no,
            date_start,
        )?)
    }

    fn create_card(&mut self, card: &NewCard) -> Result<i64, StoreError> {
        Ok(mutations::cards::create_card(&mut self.conn, card)?)
    }

    fn update_card_resolution(
        &mut self,
        card_id: i64,
        date_end: NaiveDate,
        bonus_type_key: &str,
        business_unit: &str,
    ) -> Result<(), StoreError> {
        Ok(mutations::cards::update_card_resolution(
            &mut self.conn,
            card_id,
            date_end,
            bonus_type_key,
            business_unit,
        )?)
    }

    fn update_card_state(&mut self, card_id: i64, state: CardState) -> Result<(), StoreError> {
        Ok(mutations::cards::update_card_state(
            &mut self.conn,
            card_id,
            state,
        )?)
    }

    fn update_card_state_status(
        &mut self,
        card_id: i64,
        state: CardState,
        status: CardStatus,
    ) -> Result<(), StoreError> {
        Ok(mutations::cards::update_card_state_status(
            &mut self.conn,
            card_id,
            state,
            status,
        )?)
    }

    fn update_card_deactivation(
        &mut self,
        card_id: i64,
        state: CardState,
        date_end: NaiveDate,
    ) -> Result<(), StoreError> {
        Ok(mutations::cards::update_card_deactivation(
            &mut self.conn,
            card_id,
            state,
            date_end,
        )?)
    }

    fn assessment_status(&mut self, card_id: i64) -> Result<AssessmentStatus, StoreError> {
        Ok(queries::cards::assessment_status(&mut self.conn, card_id)?)
    }

    fn set_assessment_status(
        &mut self,
        card_id: i64,
        status: AssessmentStatus,
    ) -> Result<(), StoreError> {
        Ok(mutations::cards::set_assessment_status(
            &mut self.conn,
            card_id,
            status,
        )?)
    }

    fn last_stage_entry(&mut self, card_id: i64) -> Result<Option<StageEntry>, StoreError> {
        Ok(queries::cards::last_stage_entry(&mut self.conn, card_id)?)
    }

    fn purge_approval_history(&mut self, card_id: i64) -> Result<(), StoreError> {
        Ok(mutations::cards::purge_approval_history(
            &mut self.conn,
            card_id,
        )?)
    }

    fn open_employee_cards(
        &mut self,
        period_id: i64,
        per_no: &str,
    ) -> Result<Vec<CardSnapshot>, StoreError> {
        Ok(queries::cards::open_employee_cards(
            &mut self.conn,
            period_id,
            per_no,
        )?)
    }

    fn actual_unit_cards(
        &mut self,
        period_id: i64,
        business_unit: &str,
    ) -> Result<Vec<CardSnapshot>, StoreError> {
        Ok(queries::cards::actual_unit_cards(
            &mut self.conn,
            period_id,
            business_unit,
        )?)
    }

    fn cards_ending_on_or_before(
        &mut self,
        period_id: i64,
        per_no: &str,
        cutoff: NaiveDate,
    ) -> Result<Vec<i64>, StoreError> {
        Ok(queries::cards::cards_ending_on_or_before(
            &mut self.conn,
            period_id,
            per_no,
            cutoff,
        )?)
    }

    fn has_bonus_type(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(queries::cards::has_bonus_type(&mut self.conn, key)?)
    }
}
