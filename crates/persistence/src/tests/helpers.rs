// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for the persistence tests.

use std::cell::RefCell;

use chrono::{NaiveDate, NaiveDateTime};
use perfcard::{EngineError, HrError, HrProvider, NewCard, WorkflowEngine};
use perfcard_domain::{
    BonusEntry, Division, Employee, HistoricalRecord, Period, PeriodKind, Position,
};
use uuid::Uuid;

use crate::Persistence;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn dt(y: i32, m: u32, day: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(12, 0, 0).unwrap()
}

pub fn half_year_period() -> Period {
    Period {
        id: 1,
        name: "2022 (II)".to_string(),
        kind: PeriodKind::HalfYear,
        date_start: d(2022, 7, 1),
        date_end: d(2022, 12, 31),
        generation_end_date: d(2022, 10, 1),
        assessment_end_date: d(2023, 2, 28),
        bonus_payout_date: d(2023, 3, 10),
        bonus_type_keys: vec!["9GA1".to_string(), "9GF1".to_string()],
    }
}

/// A fresh in-memory store with the half-year period and its bonus types
/// seeded.
pub fn seeded_store() -> Persistence {
    let mut store = Persistence::new_in_memory().unwrap();
    store
        .create_bonus_type("9GA1", "Corporate semiannual bonus")
        .unwrap();
    store
        .create_bonus_type("9GF1", "Corporate annual bonus")
        .unwrap();
    store.create_period(&half_year_period()).unwrap();
    store
}

pub fn new_card(per_no: &str, date_start: NaiveDate, date_end: NaiveDate, task: Uuid) -> NewCard {
    NewCard {
        per_no: per_no.to_string(),
        business_unit: "53822103".to_string(),
        bonus_type_key: "9GA1".to_string(),
        period_id: 1,
        date_start,
        date_end,
        generation_task_id: task,
    }
}

pub fn active_record(
    per_no: &str,
    unit: &str,
    seat: &str,
    from: NaiveDate,
    to: NaiveDate,
    bonus_key: &str,
) -> HistoricalRecord {
    HistoricalRecord {
        per_no: per_no.to_string(),
        division: Division {
            unit: unit.to_string(),
            hierarchy_txt: unit.to_string(),
        },
        position: Position {
            staff_position_id: seat.to_string(),
            employment_rate: Some(1.0),
            employee_group: "2".to_string(),
            employee_status: "3".to_string(),
        },
        business_from: from,
        business_to: to,
        hire_date: d(2018, 2, 5),
        fire_date: None,
        change_reason_type: None,
        bonus: vec![BonusEntry {
            business_from: from,
            business_to: to,
            bonus_type: bonus_key.to_string(),
            bonus_percent: 15.0,
        }],
    }
}

pub fn employee(per_no: &str, historical_records: Vec<HistoricalRecord>) -> Employee {
    Employee {
        per_no: per_no.to_string(),
        full_name: None,
        historical_records,
    }
}

/// Workflow engine double that records every call and always succeeds.
#[derive(Default)]
pub struct RecordingEngine {
    pub messages: RefCell<Vec<(String, String)>>,
    pub started: RefCell<Vec<(String, String)>>,
}

impl WorkflowEngine for RecordingEngine {
    fn send_message(&self, business_key: &str, message_name: &str) -> Result<(), EngineError> {
        self.messages
            .borrow_mut()
            .push((business_key.to_string(), message_name.to_string()));
        Ok(())
    }

    fn start_process(&self, process_key: &str, business_key: &str) -> Result<(), EngineError> {
        self.started
            .borrow_mut()
            .push((process_key.to_string(), business_key.to_string()));
        Ok(())
    }
}

/// HR double that hands out a fixed employee list.
pub struct StaticHr {
    pub employees: Vec<Employee>,
}

impl HrProvider for StaticHr {
    fn employees_by_unit(
        &self,
        _business_unit: &str,
        _period: &Period,
        _bonus_type_keys: &[String],
    ) -> Result<Vec<Employee>, HrError> {
        Ok(self.employees.clone())
    }
}
