// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tenure analysis over an employee's assignment history.
//!
//! Handles the quit/rehire rules: a termination only counts as a final quit
//! when no active record follows within the rehire grace window, and a
//! rehire inside the grace window keeps the employee's original hire date
//! alive for the generation cutoff.
//!
//! ## Invariants
//!
//! - Historical records are ordered by `business_from` ascending.
//! - A termination record followed by further fired records but no active
//!   one produces an event only when it is the last record of the history.
//! - Event dates never exceed the period end.

use crate::record::HistoricalRecord;
use crate::types::{CardState, Period, QuitEvent};
use chrono::{Days, NaiveDate};

/// Number of days within which a rehire keeps the tenure unbroken.
pub const REHIRE_GRACE_DAYS: i64 = 14;

/// Detects final-quit events in an employee's history.
///
/// A fired record with `business_from` no later than the period's bonus
/// payout date produces an event when the next active record starts more
/// than [`REHIRE_GRACE_DAYS`] after it, or when no further records exist at
/// all. The event date is the fire date clamped to the period end; the
/// target state marks the quit as final.
#[must_use]
pub fn find_quit_events(records: &[HistoricalRecord], period: &Period) -> Vec<QuitEvent> {
    let mut events: Vec<QuitEvent> = Vec::new();
    for (index, record) in records.iter().enumerate() {
        if !record.position.is_fired() || record.business_from > period.bonus_payout_date {
            continue;
        }
        let Some(fire_date) = record.fire_date else {
            continue;
        };
        let effective_date: NaiveDate = period.date_end.min(fire_date);
        match records[index + 1..].iter().find(|r| r.position.is_active()) {
            Some(next_active) => {
                let gap: i64 = (next_active.business_from - record.business_from).num_days();
                if gap > REHIRE_GRACE_DAYS {
                    events.push(QuitEvent {
                        effective_date,
                        target_state: CardState::NonActiveQuit,
                    });
                }
            }
            None if index + 1 == records.len() => {
                events.push(QuitEvent {
                    effective_date,
                    target_state: CardState::NonActiveQuit,
                });
            }
            None => {}
        }
    }
    events
}

/// Carries the original hire date forward across grace-window rehires.
///
/// For consecutive active records with a recognized remuneration method,
/// when the gap between one record's end and the next record's start is
/// under [`REHIRE_GRACE_DAYS`], the later record inherits the earlier hire
/// date. The generation cutoff then sees the employee's true seniority.
pub fn normalize_hire_dates(records: &mut [HistoricalRecord]) {
    let mut prev: Option<usize> = None;
    for index in 0..records.len() {
        if !(records[index].position.has_recognized_method() && records[index].position.is_active())
        {
            continue;
        }
        if let Some(prev_index) = prev {
            let gap: i64 =
                (records[index].business_from - records[prev_index].business_to).num_days();
            if gap < REHIRE_GRACE_DAYS {
                records[index].hire_date = records[prev_index].hire_date;
            }
        }
        prev = Some(index);
    }
}

/// Finds the last genuine termination record in the history.
///
/// A genuine termination is a fired record with a recognized remuneration
/// method whose fire date is the day before the record starts. Returns the
/// record's index alongside the record.
#[must_use]
pub fn last_genuine_termination(
    records: &[HistoricalRecord],
) -> Option<(usize, &HistoricalRecord)> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            record.position.is_fired()
                && record.position.has_recognized_method()
                && record
                    .fire_date
                    .is_some_and(|fire| Some(fire) == record.business_from.checked_sub_days(Days::new(1)))
        })
        .next_back()
}
