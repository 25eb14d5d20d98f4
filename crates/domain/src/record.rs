// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HR historical-record model.
//!
//! The HR system delivers each employee as an ordered list of historical
//! records. Dates arrive in three different textual shapes: record validity
//! bounds as zoned datetimes (`%Y-%m-%dT%H:%M:%S%z`), bonus-condition bounds
//! as naive datetimes (`%Y-%m-%d %H:%M:%S`), and hire/fire dates as plain
//! ISO dates. All are reduced to `NaiveDate` on deserialization.
//!
//! ## Invariants
//!
//! - `historical_records` are ordered by `business_from` ascending; the
//!   generation engine relies on that ordering.
//! - `fire_date` is present only on termination records.

use crate::types::EmployeeStatus;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Change-reason code the HR system uses for technical (non-substantive)
/// record splits, such as payroll recalculation.
pub const TECHNICAL_CHANGE_REASON: i32 = 2;

/// Remuneration method of a position.
///
/// Only these two methods participate in card generation; records with any
/// other method code are ignored wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrganizationMethod {
    /// Hourly-paid position.
    Hourly,
    /// Salaried position.
    Salaried,
}

impl OrganizationMethod {
    /// Returns the HR feed code for this method.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Hourly => "1",
            Self::Salaried => "2",
        }
    }

    /// Parses an HR feed method code; unknown codes yield `None`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::Hourly),
            "2" => Some(Self::Salaried),
            _ => None,
        }
    }
}

/// Organizational placement of a historical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    /// Identifier of the business unit the record sits in.
    pub unit: String,
    /// Unit path from the root to the deepest unit, separated by `\\`.
    pub hierarchy_txt: String,
}

/// Separator between unit identifiers in `hierarchy_txt`.
const HIERARCHY_SEPARATOR: &str = "\\\\";

impl Division {
    /// Splits the hierarchy path into unit identifiers, deepest first.
    #[must_use]
    pub fn hierarchy_units(&self) -> Vec<&str> {
        let mut units: Vec<&str> = self.hierarchy_txt.split(HIERARCHY_SEPARATOR).collect();
        units.reverse();
        units
    }

    /// Returns the deepest unit of the hierarchy path.
    #[must_use]
    pub fn deepest_unit(&self) -> &str {
        self.hierarchy_txt
            .rsplit(HIERARCHY_SEPARATOR)
            .next()
            .unwrap_or("")
    }
}

/// Position attributes of a historical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Identifier of the staff position (the "seat").
    pub staff_position_id: String,
    /// Fraction of a full-time position, if set.
    pub employment_rate: Option<f64>,
    /// Remuneration method code.
    pub employee_group: String,
    /// Employment status code.
    pub employee_status: String,
}

impl Position {
    /// Returns whether the position uses a recognized remuneration method.
    #[must_use]
    pub fn has_recognized_method(&self) -> bool {
        OrganizationMethod::from_code(&self.employee_group).is_some()
    }

    /// Returns whether the position is actively held.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.employee_status == EmployeeStatus::Active.code()
    }

    /// Returns whether the position record is a termination record.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.employee_status == EmployeeStatus::Fired.code()
    }
}

/// One bonus-condition entry attached to a historical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusEntry {
    /// First day the condition applies.
    #[serde(rename = "business_from_dttm", deserialize_with = "naive_datetime_date")]
    pub business_from: NaiveDate,
    /// Last day the condition applies.
    #[serde(rename = "business_to_dttm", deserialize_with = "naive_datetime_date")]
    pub business_to: NaiveDate,
    /// Bonus type key of the condition.
    pub bonus_type: String,
    /// Bonus percentage of the condition.
    pub bonus_percent: f64,
}

/// One historical record of an employee's assignment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    /// Personnel number the record belongs to.
    pub per_no: String,
    /// Organizational placement.
    pub division: Division,
    /// Position attributes.
    pub position: Position,
    /// First day the record is in force.
    #[serde(rename = "business_from_dttm", deserialize_with = "zoned_datetime_date")]
    pub business_from: NaiveDate,
    /// Last day the record is in force.
    #[serde(rename = "business_to_dttm", deserialize_with = "zoned_datetime_date")]
    pub business_to: NaiveDate,
    /// Hire date carried on the record.
    #[serde(rename = "hire_dt")]
    pub hire_date: NaiveDate,
    /// Fire date, present on termination records.
    #[serde(rename = "fire_dt", default)]
    pub fire_date: Option<NaiveDate>,
    /// HR change-reason code for the record split, if any.
    #[serde(default)]
    pub change_reason_type: Option<i32>,
    /// Bonus conditions attached to the record.
    #[serde(default)]
    pub bonus: Vec<BonusEntry>,
}

impl HistoricalRecord {
    /// Returns whether this record was split off for a technical reason.
    #[must_use]
    pub fn is_technical_change(&self) -> bool {
        self.change_reason_type == Some(TECHNICAL_CHANGE_REASON)
    }

    /// Returns the record's `[business_from, business_to]` interval.
    #[must_use]
    pub const fn interval(&self) -> (NaiveDate, NaiveDate) {
        (self.business_from, self.business_to)
    }
}

/// An employee as delivered by the HR provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Personnel number.
    pub per_no: String,
    /// Display name, when the feed carries one.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Assignment history, ordered by `business_from` ascending.
    pub historical_records: Vec<HistoricalRecord>,
}

fn zoned_datetime_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: String = String::deserialize(deserializer)?;
    DateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%z")
        .map(|dt| dt.date_naive())
        .map_err(serde::de::Error::custom)
}

fn naive_datetime_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: String = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .map_err(serde::de::Error::custom)
}
