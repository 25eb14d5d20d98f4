// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ports::{
    CardStore, EngineError, HrError, HrProvider, NewCard, StageEntry, StoreError, WorkflowEngine,
};
use chrono::{NaiveDate, NaiveDateTime};
use perfcard_domain::{
    AssessmentStatus, BonusEntry, CardSnapshot, CardStage, CardState, CardStatus, Division,
    Employee, HistoricalRecord, Period, PeriodKind, Position,
};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn dt(y: i32, m: u32, day: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(0, 0, 0).unwrap()
}

/// The 2022 second-half period used throughout the engine tests.
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

pub fn fired_record(
    per_no: &str,
    unit: &str,
    from: NaiveDate,
    to: NaiveDate,
    fire: NaiveDate,
) -> HistoricalRecord {
    let mut record: HistoricalRecord = active_record(per_no, unit, "SP-FIRED", from, to, "9GA1");
    record.position.employee_status = "0".to_string();
    record.fire_date = Some(fire);
    record.bonus.clear();
    record
}

pub fn employee(per_no: &str, records: Vec<HistoricalRecord>) -> Employee {
    Employee {
        per_no: per_no.to_string(),
        full_name: None,
        historical_records: records,
    }
}

/// One card with its satellite rows, as the in-memory store keeps it.
pub struct StoredCard {
    pub card: CardSnapshot,
    pub assessment: AssessmentStatus,
    pub stage_history: Vec<StageEntry>,
    pub approval_entries: u32,
}

/// Hash-map backed [`CardStore`] for engine tests.
#[derive(Default)]
pub struct InMemoryStore {
    next_id: i64,
    pub cards: BTreeMap<i64, StoredCard>,
    pub bonus_types: HashSet<String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            cards: BTreeMap::new(),
            bonus_types: ["9GA1", "9GF1"].iter().map(ToString::to_string).collect(),
        }
    }

    /// Inserts a pre-existing card, assigning it the next id.
    pub fn seed_card(&mut self, mut card: CardSnapshot, assessment: AssessmentStatus) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        card.id = id;
        self.cards.insert(
            id,
            StoredCard {
                card,
                assessment,
                stage_history: Vec::new(),
                approval_entries: 1,
            },
        );
        id
    }

    pub fn push_stage(
        &mut self,
        card_id: i64,
        stage: CardStage,
        started_at: NaiveDateTime,
        ended_at: Option<NaiveDateTime>,
    ) {
        if let Some(stored) = self.cards.get_mut(&card_id) {
            stored.stage_history.push(StageEntry {
                stage,
                started_at,
                ended_at,
            });
        }
    }

    pub fn card(&self, card_id: i64) -> &CardSnapshot {
        &self.cards.get(&card_id).expect("card must exist").card
    }

    pub fn stored(&self, card_id: i64) -> &StoredCard {
        self.cards.get(&card_id).expect("card must exist")
    }

    fn stored_mut(&mut self, card_id: i64) -> Result<&mut StoredCard, StoreError> {
        self.cards
            .get_mut(&card_id)
            .ok_or_else(|| StoreError::NotFound(format!("card {card_id}")))
    }
}

/// A seeded card snapshot with sensible defaults; tweak fields per test.
pub fn seeded_card(per_no: &str, unit: &str, start: NaiveDate, end: NaiveDate) -> CardSnapshot {
    CardSnapshot {
        id: 0,
        per_no: per_no.to_string(),
        business_unit: unit.to_string(),
        period_id: 1,
        date_start: start,
        date_end: end,
        state: CardState::Active,
        status: CardStatus::InWork,
        stage: CardStage::OnSetting,
        bonus_type_key: "9GA1".to_string(),
        generation_task_id: None,
    }
}

impl CardStore for InMemoryStore {
    fn find_card(
        &mut self,
        period_id: i64,
        per_no: &str,
        date_start: NaiveDate,
    ) -> Result<Option<CardSnapshot>, StoreError> {
        Ok(self
            .cards
            .values()
            .map(|stored| &stored.card)
            .find(|card| {
                card.period_id == period_id
                    && card.per_no == per_no
                    && card.date_start == date_start
            })
            .cloned())
    }

    fn create_card(&mut self, card: &NewCard) -> Result<i64, StoreError> {
        let duplicate = self.cards.values().any(|stored| {
            stored.card.per_no == card.per_no
                && stored.card.business_unit == card.business_unit
                && stored.card.period_id == card.period_id
                && stored.card.date_start == card.date_start
                && stored.card.date_end == card.date_end
        });
        if duplicate {
            return Err(StoreError::ConstraintViolation(
                "cards natural key".to_string(),
            ));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.cards.insert(
            id,
            StoredCard {
                card: CardSnapshot {
                    id,
                    per_no: card.per_no.clone(),
                    business_unit: card.business_unit.clone(),
                    period_id: card.period_id,
                    date_start: card.date_start,
                    date_end: card.date_end,
                    state: CardState::Active,
                    status: CardStatus::IsProcessed,
                    stage: CardStage::OnSetting,
                    bonus_type_key: card.bonus_type_key.clone(),
                    generation_task_id: Some(card.generation_task_id),
                },
                assessment: AssessmentStatus::NotStarted,
                stage_history: Vec::new(),
                approval_entries: 0,
            },
        );
        Ok(id)
    }

    fn update_card_resolution(
        &mut self,
        card_id: i64,
        date_end: NaiveDate,
        bonus_type_key: &str,
        business_unit: &str,
    ) -> Result<(), StoreError> {
        let stored = self.stored_mut(card_id)?;
        stored.card.date_end = date_end;
        stored.card.bonus_type_key = bonus_type_key.to_string();
        stored.card.business_unit = business_unit.to_string();
        Ok(())
    }

    fn update_card_state(&mut self, card_id: i64, state: CardState) -> Result<(), StoreError> {
        self.stored_mut(card_id)?.card.state = state;
        Ok(())
    }

    fn update_card_state_status(
        &mut self,
        card_id: i64,
        state: CardState,
        status: CardStatus,
    ) -> Result<(), StoreError> {
        let stored = self.stored_mut(card_id)?;
        stored.card.state = state;
        stored.card.status = status;
        Ok(())
    }

    fn update_card_deactivation(
        &mut self,
        card_id: i64,
        state: CardState,
        date_end: NaiveDate,
    ) -> Result<(), StoreError> {
        let stored = self.stored_mut(card_id)?;
        stored.card.state = state;
        stored.card.date_end = date_end;
        Ok(())
    }

    fn assessment_status(&mut self, card_id: i64) -> Result<AssessmentStatus, StoreError> {
        Ok(self.stored_mut(card_id)?.assessment)
    }

    fn set_assessment_status(
        &mut self,
        card_id: i64,
        status: AssessmentStatus,
    ) -> Result<(), StoreError> {
        self.stored_mut(card_id)?.assessment = status;
        Ok(())
    }

    fn last_stage_entry(&mut self, card_id: i64) -> Result<Option<StageEntry>, StoreError> {
        Ok(self
            .stored_mut(card_id)?
            .stage_history
            .iter()
            .max_by_key(|entry| entry.started_at)
            .copied())
    }

    fn purge_approval_history(&mut self, card_id: i64) -> Result<(), StoreError> {
        self.stored_mut(card_id)?.approval_entries = 0;
        Ok(())
    }

    fn open_employee_cards(
        &mut self,
        period_id: i64,
        per_no: &str,
    ) -> Result<Vec<CardSnapshot>, StoreError> {
        Ok(self
            .cards
            .values()
            .map(|stored| &stored.card)
            .filter(|card| {
                card.period_id == period_id && card.per_no == per_no && card.state.is_open()
            })
            .cloned()
            .collect())
    }

    fn actual_unit_cards(
        &mut self,
        period_id: i64,
        business_unit: &str,
    ) -> Result<Vec<CardSnapshot>, StoreError> {
        Ok(self
            .cards
            .values()
            .map(|stored| &stored.card)
            .filter(|card| {
                card.period_id == period_id
                    && card.business_unit == business_unit
                    && card.state.is_actual()
                    && card.state != CardState::Closed
            })
            .cloned()
            .collect())
    }

    fn cards_ending_on_or_before(
        &mut self,
        period_id: i64,
        per_no: &str,
        cutoff: NaiveDate,
    ) -> Result<Vec<i64>, StoreError> {
        Ok(self
            .cards
            .values()
            .map(|stored| &stored.card)
            .filter(|card| {
                card.period_id == period_id && card.per_no == per_no && card.date_end <= cutoff
            })
            .map(|card| card.id)
            .collect())
    }

    fn has_bonus_type(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(self.bonus_types.contains(key))
    }
}

/// Call-recording [`WorkflowEngine`] whose failures are scripted per test.
#[derive(Default)]
pub struct ScriptedEngine {
    pub fail_send: Cell<bool>,
    pub fail_start: Cell<bool>,
    pub messages: RefCell<Vec<(String, String)>>,
    pub started: RefCell<Vec<(String, String)>>,
}

impl WorkflowEngine for ScriptedEngine {
    fn send_message(&self, business_key: &str, message_name: &str) -> Result<(), EngineError> {
        if self.fail_send.get() {
            return Err(EngineError::Rejected {
                status: 500,
                body: "scripted send failure".to_string(),
            });
        }
        self.messages
            .borrow_mut()
            .push((business_key.to_string(), message_name.to_string()));
        Ok(())
    }

    fn start_process(&self, process_key: &str, business_key: &str) -> Result<(), EngineError> {
        if self.fail_start.get() {
            return Err(EngineError::Rejected {
                status: 500,
                body: "scripted start failure".to_string(),
            });
        }
        self.started
            .borrow_mut()
            .push((process_key.to_string(), business_key.to_string()));
        Ok(())
    }
}

/// Canned [`HrProvider`] returning a fixed employee list.
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
