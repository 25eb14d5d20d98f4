// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Eligibility filter.
//!
//! Decides, per resolved card window, whether a run of historical records
//! earns a card. Bonus conditions were already checked while resolving the
//! windows; what remains is the position check (someone actually works a
//! positive rate under a recognized method during the window) and the hire
//! cutoff.
//!
//! ## Invariants
//!
//! - Only records overlapping the card window are consulted for the
//!   position check; the rate and the method may be satisfied by different
//!   records.
//! - The hire cutoff reads the first record of the run; the HR feed carries
//!   the same hire date on every record of a tenure.

use crate::interval::{DateInterval, intervals_overlap};
use crate::record::HistoricalRecord;
use crate::types::Period;
use chrono::NaiveDate;

fn overlapping_records<'a>(
    records: &'a [HistoricalRecord],
    window: DateInterval,
) -> impl Iterator<Item = &'a HistoricalRecord> {
    records
        .iter()
        .filter(move |record| intervals_overlap(record.interval(), window))
}

/// Position check: some record overlapping the window has a positive
/// employment rate, and some record overlapping the window has a recognized
/// remuneration method.
#[must_use]
pub fn suitable_by_position(records: &[HistoricalRecord], window: DateInterval) -> bool {
    let positive_rate: bool = overlapping_records(records, window)
        .any(|record| record.position.employment_rate.is_some_and(|rate| rate > 0.0));
    let recognized_method: bool =
        overlapping_records(records, window).any(|record| record.position.has_recognized_method());
    positive_rate && recognized_method
}

/// Hire cutoff: the employee was hired no later than the period's card
/// generation end date. An empty run is never suitable.
#[must_use]
pub fn suitable_by_position_status(
    records: &[HistoricalRecord],
    generation_end_date: NaiveDate,
) -> bool {
    records
        .first()
        .is_some_and(|record| record.hire_date <= generation_end_date)
}

/// Full eligibility decision for one resolved card window.
#[must_use]
pub fn is_suited(records: &[HistoricalRecord], period: &Period, window: DateInterval) -> bool {
    suitable_by_position_status(records, period.generation_end_date)
        && suitable_by_position(records, window)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::record::{Division, Position};
    use crate::types::PeriodKind;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn record(
        from: NaiveDate,
        to: NaiveDate,
        rate: Option<f64>,
        group: &str,
        hire: NaiveDate,
    ) -> HistoricalRecord {
        HistoricalRecord {
            per_no: "00001234".to_string(),
            division: Division {
                unit: "41000000".to_string(),
                hierarchy_txt: "41000000".to_string(),
            },
            position: Position {
                staff_position_id: "SP-1".to_string(),
                employment_rate: rate,
                employee_group: group.to_string(),
                employee_status: "3".to_string(),
            },
            business_from: from,
            business_to: to,
            hire_date: hire,
            fire_date: None,
            change_reason_type: None,
            bonus: Vec::new(),
        }
    }

    fn period() -> Period {
        Period {
            id: 1,
            name: "2022 H2".to_string(),
            kind: PeriodKind::HalfYear,
            date_start: d(2022, 7, 1),
            date_end: d(2022, 12, 31),
            generation_end_date: d(2022, 10, 1),
            assessment_end_date: d(2023, 2, 1),
            bonus_payout_date: d(2023, 3, 10),
            bonus_type_keys: vec!["9GA1".to_string()],
        }
    }

    #[test]
    fn rate_and_method_may_come_from_different_records() {
        let hire: NaiveDate = d(2020, 1, 1);
        let records = vec![
            record(d(2022, 7, 1), d(2022, 9, 30), Some(1.0), "9", hire),
            record(d(2022, 10, 1), d(2022, 12, 31), None, "2", hire),
        ];
        assert!(suitable_by_position(
            &records,
            (d(2022, 7, 1), d(2022, 12, 31))
        ));
    }

    #[test]
    fn zero_rate_everywhere_fails_the_position_check() {
        let hire: NaiveDate = d(2020, 1, 1);
        let records = vec![record(d(2022, 7, 1), d(2022, 12, 31), Some(0.0), "2", hire)];
        assert!(!suitable_by_position(
            &records,
            (d(2022, 7, 1), d(2022, 12, 31))
        ));
    }

    #[test]
    fn records_outside_the_window_do_not_count() {
        let hire: NaiveDate = d(2020, 1, 1);
        let records = vec![
            record(d(2022, 1, 1), d(2022, 6, 30), Some(1.0), "2", hire),
            record(d(2022, 7, 1), d(2022, 12, 31), None, "9", hire),
        ];
        assert!(!suitable_by_position(
            &records,
            (d(2022, 7, 1), d(2022, 12, 31))
        ));
    }

    #[test]
    fn hire_cutoff_is_inclusive() {
        let window: DateInterval = (d(2022, 7, 1), d(2022, 12, 31));
        let p = period();
        let on_cutoff = vec![record(
            d(2022, 10, 1),
            d(2022, 12, 31),
            Some(1.0),
            "2",
            d(2022, 10, 1),
        )];
        assert!(is_suited(&on_cutoff, &p, window));
        let past_cutoff = vec![record(
            d(2022, 10, 2),
            d(2022, 12, 31),
            Some(1.0),
            "2",
            d(2022, 10, 2),
        )];
        assert!(!is_suited(&past_cutoff, &p, window));
    }

    #[test]
    fn empty_run_is_not_suitable() {
        assert!(!suitable_by_position_status(&[], d(2022, 10, 1)));
    }
}
