// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use perfcard::{CardStore, StoreError};
use perfcard_domain::{AssessmentStatus, CardStage, CardState, CardStatus};
use uuid::Uuid;

use crate::tests::helpers::{d, dt, half_year_period, new_card, seeded_store};

#[test]
fn created_card_round_trips_with_lifecycle_defaults() {
    let mut store = seeded_store();
    let task = Uuid::new_v4();
    let id = store
        .create_card(&new_card("1000001", d(2022, 7, 1), d(2022, 12, 31), task))
        .unwrap();

    let found = store
        .find_card(1, "1000001", d(2022, 7, 1))
        .unwrap()
        .unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.business_unit, "53822103");
    assert_eq!(found.bonus_type_key, "9GA1");
    assert_eq!(found.date_end, d(2022, 12, 31));
    assert_eq!(found.state, CardState::Active);
    assert_eq!(found.status, CardStatus::IsProcessed);
    assert_eq!(found.stage, CardStage::OnSetting);
    assert_eq!(found.generation_task_id, Some(task));
    assert_eq!(
        store.assessment_status(id).unwrap(),
        AssessmentStatus::NotStarted
    );
}

#[test]
fn duplicate_natural_key_is_a_constraint_violation() {
    let mut store = seeded_store();
    store
        .create_card(&new_card(
            "1000002",
            d(2022, 7, 1),
            d(2022, 12, 31),
            Uuid::new_v4(),
        ))
        .unwrap();

    let result = store.create_card(&new_card(
        "1000002",
        d(2022, 7, 1),
        d(2022, 10, 31),
        Uuid::new_v4(),
    ));
    assert!(matches!(result, Err(StoreError::ConstraintViolation(_))));
}

#[test]
fn unknown_bonus_type_on_create_is_not_found() {
    let mut store = seeded_store();
    let mut card = new_card("1000003", d(2022, 7, 1), d(2022, 12, 31), Uuid::new_v4());
    card.bonus_type_key = "ZZZZ".to_string();
    assert!(matches!(
        store.create_card(&card),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn missing_card_is_not_silently_updated() {
    let mut store = seeded_store();
    assert!(matches!(
        store.update_card_state(4242, CardState::NonActive),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn resolution_update_rewrites_end_bonus_and_unit() {
    let mut store = seeded_store();
    let id = store
        .create_card(&new_card(
            "1000004",
            d(2022, 7, 1),
            d(2022, 12, 31),
            Uuid::new_v4(),
        ))
        .unwrap();

    store
        .update_card_resolution(id, d(2022, 11, 30), "9GF1", "53822200")
        .unwrap();
    let card = store.card(id).unwrap();
    assert_eq!(card.date_end, d(2022, 11, 30));
    assert_eq!(card.bonus_type_key, "9GF1");
    assert_eq!(card.business_unit, "53822200");
    // The natural key stays put.
    assert_eq!(card.date_start, d(2022, 7, 1));
}

#[test]
fn open_employee_cards_exclude_closed_and_quit() {
    let mut store = seeded_store();
    let open_id = store
        .create_card(&new_card(
            "1000005",
            d(2022, 7, 1),
            d(2022, 9, 30),
            Uuid::new_v4(),
        ))
        .unwrap();
    let closed_id = store
        .create_card(&new_card(
            "1000005",
            d(2022, 10, 1),
            d(2022, 11, 30),
            Uuid::new_v4(),
        ))
        .unwrap();
    let quit_id = store
        .create_card(&new_card(
            "1000005",
            d(2022, 12, 1),
            d(2022, 12, 31),
            Uuid::new_v4(),
        ))
        .unwrap();
    store.update_card_state(closed_id, CardState::Closed).unwrap();
    store
        .update_card_state(quit_id, CardState::NonActiveQuit)
        .unwrap();
    // Non-Active cards stay open to further deactivation.
    let non_active_id = store
        .create_card(&new_card(
            "1000005",
            d(2022, 6, 1),
            d(2022, 6, 30),
            Uuid::new_v4(),
        ))
        .unwrap();
    store
        .update_card_state(non_active_id, CardState::NonActive)
        .unwrap();

    let ids: Vec<i64> = store
        .open_employee_cards(1, "1000005")
        .unwrap()
        .into_iter()
        .map(|card| card.id)
        .collect();
    assert_eq!(ids, vec![open_id, non_active_id]);
}

#[test]
fn actual_unit_cards_exclude_deactivated_states() {
    let mut store = seeded_store();
    let active_id = store
        .create_card(&new_card(
            "1000006",
            d(2022, 7, 1),
            d(2022, 12, 31),
            Uuid::new_v4(),
        ))
        .unwrap();
    let non_active_id = store
        .create_card(&new_card(
            "1000007",
            d(2022, 7, 1),
            d(2022, 12, 31),
            Uuid::new_v4(),
        ))
        .unwrap();
    store
        .update_card_state(non_active_id, CardState::NonActive)
        .unwrap();
    let frozen_id = store
        .create_card(&new_card(
            "1000008",
            d(2022, 7, 1),
            d(2022, 12, 31),
            Uuid::new_v4(),
        ))
        .unwrap();
    store.update_card_state(frozen_id, CardState::Frozen).unwrap();

    let ids: Vec<i64> = store
        .actual_unit_cards(1, "53822103")
        .unwrap()
        .into_iter()
        .map(|card| card.id)
        .collect();
    assert_eq!(ids, vec![active_id, frozen_id]);
}

#[test]
fn end_date_cutoff_respects_date_order() {
    let mut store = seeded_store();
    let early_id = store
        .create_card(&new_card(
            "1000009",
            d(2022, 7, 1),
            d(2022, 9, 30),
            Uuid::new_v4(),
        ))
        .unwrap();
    let _late_id = store
        .create_card(&new_card(
            "1000009",
            d(2022, 10, 1),
            d(2022, 12, 31),
            Uuid::new_v4(),
        ))
        .unwrap();

    let ids = store
        .cards_ending_on_or_before(1, "1000009", d(2022, 9, 30))
        .unwrap();
    assert_eq!(ids, vec![early_id]);
}

#[test]
fn assessment_status_is_writable() {
    let mut store = seeded_store();
    let id = store
        .create_card(&new_card(
            "1000010",
            d(2022, 7, 1),
            d(2022, 12, 31),
            Uuid::new_v4(),
        ))
        .unwrap();

    store
        .set_assessment_status(id, AssessmentStatus::IsProcessed)
        .unwrap();
    assert_eq!(
        store.assessment_status(id).unwrap(),
        AssessmentStatus::IsProcessed
    );
    assert!(matches!(
        store.assessment_status(4242),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn last_stage_entry_prefers_the_latest_start() {
    let mut store = seeded_store();
    let id = store
        .create_card(&new_card(
            "1000011",
            d(2022, 7, 1),
            d(2022, 12, 31),
            Uuid::new_v4(),
        ))
        .unwrap();
    assert_eq!(store.last_stage_entry(id).unwrap(), None);

    store
        .add_stage_entry(
            id,
            CardStage::OnSetting,
            dt(2022, 7, 1),
            Some(dt(2022, 9, 1)),
        )
        .unwrap();
    store
        .add_stage_entry(id, CardStage::OnAssessment, dt(2022, 11, 1), None)
        .unwrap();

    let entry = store.last_stage_entry(id).unwrap().unwrap();
    assert_eq!(entry.stage, CardStage::OnAssessment);
    assert_eq!(entry.started_at, dt(2022, 11, 1));
    assert_eq!(entry.ended_at, None);
}

#[test]
fn purging_approval_history_deletes_every_entry() {
    let mut store = seeded_store();
    let id = store
        .create_card(&new_card(
            "1000012",
            d(2022, 7, 1),
            d(2022, 12, 31),
            Uuid::new_v4(),
        ))
        .unwrap();
    store
        .add_approval_entry(id, "2047458", "approved", dt(2022, 8, 1))
        .unwrap();
    store
        .add_approval_entry(id, "2047459", "approved", dt(2022, 8, 2))
        .unwrap();
    assert_eq!(store.approval_entry_count(id).unwrap(), 2);

    store.purge_approval_history(id).unwrap();
    assert_eq!(store.approval_entry_count(id).unwrap(), 0);
    // Purging twice is harmless.
    store.purge_approval_history(id).unwrap();
}

#[test]
fn has_bonus_type_checks_the_catalogue() {
    let mut store = seeded_store();
    assert!(store.has_bonus_type("9GA1").unwrap());
    assert!(!store.has_bonus_type("9GX9").unwrap());
}

#[test]
fn period_round_trips_with_its_keys() {
    let mut store = seeded_store();
    let period = store.load_period(1).unwrap();
    assert_eq!(period, half_year_period());
    assert!(store.load_period(2).is_err());
}
