// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Period and bonus-type write operations.

use diesel::prelude::*;
use perfcard_domain::Period;

use crate::data_models::{NewBonusTypeRow, NewPeriodBonusTypeRow, NewPeriodRow};
use crate::diesel_schema::{employee_bonus_types, period_bonus_types, periods};
use crate::error::PersistenceError;
use crate::queries::periods::bonus_type_id;
use crate::sqlite::get_last_insert_rowid;

/// Creates a bonus type and returns its row id.
///
/// # Errors
///
/// Returns `ConstraintViolation` when the key already exists.
pub fn create_bonus_type(
    conn: &mut SqliteConnection,
    key: &str,
    name: &str,
) -> Result<i64, PersistenceError> {
    let row = NewBonusTypeRow {
        bonus_key: key,
        name,
    };
    diesel::insert_into(employee_bonus_types::table)
        .values(&row)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Creates a period and attaches its bonus type keys.
///
/// The period keeps the id carried by the domain value. Every key in
/// `bonus_type_keys` must already exist as a bonus type.
///
/// # Errors
///
/// Returns `NotFound` when a bonus type key is unknown, and
/// `ConstraintViolation` when the period id is already taken.
pub fn create_period(conn: &mut SqliteConnection, period: &Period) -> Result<i64, PersistenceError> {
    conn.transaction(|conn| {
        let row: NewPeriodRow = NewPeriodRow::from_period(period);
        diesel::insert_into(periods::table).values(&row).execute(conn)?;

        for key in &period.bonus_type_keys {
            let bonus_type: i64 = bonus_type_id(conn, key)?
                .ok_or_else(|| PersistenceError::NotFound(format!("bonus type '{key}'")))?;
            let link = NewPeriodBonusTypeRow {
                period_id: period.id,
                bonus_type_id: bonus_type,
            };
            diesel::insert_into(period_bonus_types::table)
                .values(&link)
                .execute(conn)?;
        }
        Ok(period.id)
    })
}
