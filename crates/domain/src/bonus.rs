// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bonus period resolution.
//!
//! Cards are cut along the employee's bonus conditions: a card covers a
//! contiguous stretch of days with a single bonus type. This module derives
//! those stretches from the historical records, merges them across record
//! boundaries, and clips them to the candidate card window.
//!
//! ## Invariants
//!
//! - A qualifying run never mixes bonus types; a type change always starts a
//!   new stretch.
//! - Non-qualifying entries are skipped without closing the current stretch.
//! - Each record contributes its division's deepest unit as the stretch's
//!   business unit.

use crate::interval::{DateInterval, clip_intersection};
use crate::record::{BonusEntry, HistoricalRecord};
use crate::types::{BonusPeriod, Period, PeriodKind};

/// Business unit whose subtree is scored under the special-division rules.
pub const SPECIAL_DIVISION_UNIT: &str = "51047541";

/// Administrative twin of [`SPECIAL_DIVISION_UNIT`].
pub const SPECIAL_DIVISION_ADMIN_UNIT: &str = "52692242";

/// Minimum bonus percent for yearly special-division qualification,
/// exclusive.
pub const SPECIAL_DIVISION_MIN_BONUS_PERCENT: f64 = 10.0;

/// Which rule set applies to a record's bonus conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BonusStrategy {
    /// The record sits under one of the special-division units.
    SpecialDivision,
    /// Everything else.
    Corporate,
}

/// Resolves the bonus strategy for a record's unit hierarchy.
///
/// The hierarchy is checked deepest-first; any occurrence of a
/// special-division unit anywhere in the path selects
/// [`BonusStrategy::SpecialDivision`].
#[must_use]
pub fn resolve_strategy(hierarchy_units: &[&str]) -> BonusStrategy {
    if hierarchy_units
        .iter()
        .any(|unit| *unit == SPECIAL_DIVISION_UNIT || *unit == SPECIAL_DIVISION_ADMIN_UNIT)
    {
        BonusStrategy::SpecialDivision
    } else {
        BonusStrategy::Corporate
    }
}

/// Returns whether a bonus-condition entry qualifies under the given
/// strategy and period.
///
/// Every strategy requires the entry's bonus type to be among the period's
/// configured types. The special-division strategy additionally requires,
/// for yearly periods only, a bonus percent strictly above
/// [`SPECIAL_DIVISION_MIN_BONUS_PERCENT`].
#[must_use]
pub fn bonus_qualifies(strategy: BonusStrategy, period: &Period, entry: &BonusEntry) -> bool {
    if !period
        .bonus_type_keys
        .iter()
        .any(|key| key == &entry.bonus_type)
    {
        return false;
    }
    if strategy == BonusStrategy::SpecialDivision && period.kind == PeriodKind::Year {
        return entry.bonus_percent > SPECIAL_DIVISION_MIN_BONUS_PERCENT;
    }
    true
}

/// Derives the bonus periods of a single historical record.
#[must_use]
pub fn find_record_bonus_periods(record: &HistoricalRecord, period: &Period) -> Vec<BonusPeriod> {
    let hierarchy: Vec<&str> = record.division.hierarchy_units();
    let strategy: BonusStrategy = resolve_strategy(&hierarchy);
    let business_unit: &str = hierarchy.first().copied().unwrap_or("");

    let mut periods: Vec<BonusPeriod> = Vec::new();
    let mut open: Option<BonusPeriod> = None;
    for entry in &record.bonus {
        if !bonus_qualifies(strategy, period, entry) {
            continue;
        }
        match open.as_mut() {
            None => {
                open = Some(BonusPeriod {
                    start: entry.business_from,
                    end: entry.business_to,
                    bonus_type: entry.bonus_type.clone(),
                    business_unit: business_unit.to_string(),
                });
            }
            Some(current) if current.bonus_type != entry.bonus_type => {
                periods.push(current.clone());
                open = Some(BonusPeriod {
                    start: entry.business_from,
                    end: entry.business_to,
                    bonus_type: entry.bonus_type.clone(),
                    business_unit: business_unit.to_string(),
                });
            }
            Some(current) => {
                current.end = entry.business_to;
            }
        }
    }
    if let Some(current) = open {
        periods.push(current);
    }
    periods
}

/// Merges a record's bonus periods into the accumulated list.
///
/// When the last accumulated stretch and the first new one carry the same
/// bonus type, the stretch is extended (and takes the new record's business
/// unit) instead of being duplicated.
pub fn merge_bonus_periods(accumulated: &mut Vec<BonusPeriod>, new_periods: Vec<BonusPeriod>) {
    for bonus in new_periods {
        match accumulated.last_mut() {
            Some(last) if last.bonus_type == bonus.bonus_type => {
                last.end = bonus.end;
                last.business_unit = bonus.business_unit;
            }
            _ => accumulated.push(bonus),
        }
    }
}

/// Derives the merged bonus periods of a run of historical records.
#[must_use]
pub fn find_bonus_periods(records: &[HistoricalRecord], period: &Period) -> Vec<BonusPeriod> {
    let mut accumulated: Vec<BonusPeriod> = Vec::new();
    for record in records {
        let record_periods: Vec<BonusPeriod> = find_record_bonus_periods(record, period);
        if !record_periods.is_empty() {
            merge_bonus_periods(&mut accumulated, record_periods);
        }
    }
    accumulated
}

/// Resolves the card windows for a run of records: merged bonus periods
/// clipped to the candidate card window. Stretches that miss the window
/// entirely are dropped.
#[must_use]
pub fn resolve_card_periods(
    records: &[HistoricalRecord],
    period: &Period,
    window: DateInterval,
) -> Vec<BonusPeriod> {
    find_bonus_periods(records, period)
        .into_iter()
        .filter_map(|bonus| {
            clip_intersection((bonus.start, bonus.end), window).map(|(start, end)| BonusPeriod {
                start,
                end,
                ..bonus
            })
        })
        .collect()
}
