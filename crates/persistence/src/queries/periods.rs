// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Period and bonus-type read queries.

use diesel::prelude::*;
use perfcard_domain::Period;

use crate::data_models::PeriodRow;
use crate::diesel_schema::{employee_bonus_types, period_bonus_types, periods};
use crate::error::PersistenceError;

/// Resolves a bonus type key to its row id.
///
/// # Errors
///
/// Returns an error when the query fails.
pub fn bonus_type_id(
    conn: &mut SqliteConnection,
    key: &str,
) -> Result<Option<i64>, PersistenceError> {
    Ok(employee_bonus_types::table
        .filter(employee_bonus_types::bonus_key.eq(key))
        .select(employee_bonus_types::bonus_type_id)
        .first(conn)
        .optional()?)
}

/// Returns the bonus type keys attached to a period, in attachment order.
///
/// # Errors
///
/// Returns an error when the query fails.
pub fn period_bonus_keys(
    conn: &mut SqliteConnection,
    period_id: i64,
) -> Result<Vec<String>, PersistenceError> {
    Ok(period_bonus_types::table
        .inner_join(employee_bonus_types::table)
        .filter(period_bonus_types::period_id.eq(period_id))
        .order(period_bonus_types::id.asc())
        .select(employee_bonus_types::bonus_key)
        .load(conn)?)
}

/// Loads a period with its bonus type keys.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] when the period does not exist.
pub fn load_period(conn: &mut SqliteConnection, period_id: i64) -> Result<Period, PersistenceError> {
    let row: PeriodRow = periods::table
        .filter(periods::period_id.eq(period_id))
        .select(PeriodRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("period {period_id}")))?;
    let keys: Vec<String> = period_bonus_keys(conn, period_id)?;
    row.into_period(keys)
}
