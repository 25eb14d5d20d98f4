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

mod bonus;
mod error;
mod filter;
mod interval;
mod record;
mod tenure;
mod types;

pub use bonus::{
    BonusStrategy, SPECIAL_DIVISION_ADMIN_UNIT, SPECIAL_DIVISION_MIN_BONUS_PERCENT,
    SPECIAL_DIVISION_UNIT, bonus_qualifies, find_bonus_periods, merge_bonus_periods,
    resolve_card_periods, resolve_strategy,
};
pub use error::DomainError;
pub use filter::{is_suited, suitable_by_position, suitable_by_position_status};
pub use interval::{DateInterval, clip_intersection, intervals_overlap};
pub use record::{
    BonusEntry, Division, Employee, HistoricalRecord, OrganizationMethod, Position,
    TECHNICAL_CHANGE_REASON,
};
pub use tenure::{
    REHIRE_GRACE_DAYS, find_quit_events, last_genuine_termination, normalize_hire_dates,
};
pub use types::{
    AssessmentStatus, BonusPeriod, CardSnapshot, CardStage, CardState, CardStatus, EmployeeStatus,
    Period, PeriodKind, QuitEvent,
};
