// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Card deactivation.
//!
//! Deactivation persists the new state first and notifies the workflow
//! engine second; a rejected notification rolls the card back to its
//! snapshot. Cards whose workflow already finished (approved setting or
//! assessment) and cards that were already non-active are deactivated
//! silently.
//!
//! ## Invariants
//!
//! - A successful deactivation leaves no live agreement process behind:
//!   either the engine accepted the deactivation message or none was owed.
//! - A failed deactivation leaves the card's state and end date exactly as
//!   found.

use crate::ports::{
    CardStore, StoreError, WorkflowEngine, agreement_business_key, deactivate_message_name,
};
use chrono::NaiveDate;
use perfcard_domain::{
    AssessmentStatus, CardSnapshot, CardStage, CardState, CardStatus, Period, QuitEvent,
};
use std::collections::HashSet;
use tracing::error;

/// Running totals of a deactivation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeactivationCounts {
    /// Cards successfully deactivated.
    pub deactivated: u64,
    /// Cards whose deactivation was rolled back.
    pub errors: u64,
}

impl DeactivationCounts {
    fn record(&mut self, succeeded: bool) {
        if succeeded {
            self.deactivated += 1;
        } else {
            self.errors += 1;
        }
    }
}

/// Moves one card to `new_state` with `new_end`, notifying the workflow
/// engine when an agreement process may still be live.
///
/// Returns `Ok(true)` when the card stays deactivated and `Ok(false)` when
/// the engine rejected the notification and the card was rolled back.
///
/// # Errors
///
/// Returns a [`StoreError`] when a store write fails, including the
/// rollback write itself.
pub fn deactivate_card<S, E>(
    store: &mut S,
    engine: &E,
    card: &CardSnapshot,
    new_state: CardState,
    new_end: NaiveDate,
) -> Result<bool, StoreError>
where
    S: CardStore,
    E: WorkflowEngine,
{
    let previous_state: CardState = card.state;
    let previous_end: NaiveDate = card.date_end;
    store.update_card_deactivation(card.id, new_state, new_end)?;

    let setting_approved: bool = matches!(
        card.stage,
        CardStage::OnSetting | CardStage::OnActualization
    ) && card.status == CardStatus::Approved;
    let assessment_approved: bool =
        store.assessment_status(card.id)? == AssessmentStatus::Approved;
    if setting_approved || assessment_approved || previous_state == CardState::NonActive {
        // No live process to tear down.
        return Ok(true);
    }

    match engine.send_message(
        &agreement_business_key(card.id),
        &deactivate_message_name(card.id),
    ) {
        Ok(()) => {
            if card.status != CardStatus::Approved {
                store.purge_approval_history(card.id)?;
            }
            Ok(true)
        }
        Err(e) => {
            error!(card_id = card.id, error = %e, "Card deactivation message failed");
            store.update_card_deactivation(card.id, previous_state, previous_end)?;
            Ok(false)
        }
    }
}

/// Employee-level deactivation: sweeps the employee's open cards that this
/// run did not touch.
///
/// With quit events, a card starting before an event's effective date takes
/// the event's state and an end date clamped to the event; only the first
/// matching event applies. Without quit events every untouched open card
/// goes to `Non-Active` keeping its end date.
///
/// # Errors
///
/// Returns a [`StoreError`] when a store operation fails.
pub fn deactivate_employee_cards<S, E>(
    store: &mut S,
    engine: &E,
    period: &Period,
    per_no: &str,
    quit_events: &[QuitEvent],
    exclude_card_ids: &HashSet<i64>,
    counts: &mut DeactivationCounts,
) -> Result<(), StoreError>
where
    S: CardStore,
    E: WorkflowEngine,
{
    let cards: Vec<CardSnapshot> = store.open_employee_cards(period.id, per_no)?;
    for card in cards {
        if exclude_card_ids.contains(&card.id) {
            continue;
        }
        if quit_events.is_empty() {
            let succeeded: bool =
                deactivate_card(store, engine, &card, CardState::NonActive, card.date_end)?;
            counts.record(succeeded);
        } else if let Some(event) = quit_events
            .iter()
            .find(|event| card.date_start < event.effective_date)
        {
            let new_end: NaiveDate = card.date_end.min(event.effective_date);
            let succeeded: bool =
                deactivate_card(store, engine, &card, event.target_state, new_end)?;
            counts.record(succeeded);
        }
    }
    Ok(())
}

/// Unit-level deactivation: sweeps the unit's actual cards that no employee
/// pass touched, moving them to `Non-Active` with their existing end dates.
///
/// # Errors
///
/// Returns a [`StoreError`] when a store operation fails.
pub fn deactivate_unit_cards<S, E>(
    store: &mut S,
    engine: &E,
    period: &Period,
    business_unit: &str,
    touched_card_ids: &HashSet<i64>,
    counts: &mut DeactivationCounts,
) -> Result<(), StoreError>
where
    S: CardStore,
    E: WorkflowEngine,
{
    let cards: Vec<CardSnapshot> = store.actual_unit_cards(period.id, business_unit)?;
    for card in cards {
        if touched_card_ids.contains(&card.id) {
            continue;
        }
        let succeeded: bool =
            deactivate_card(store, engine, &card, CardState::NonActive, card.date_end)?;
        counts.record(succeeded);
    }
    Ok(())
}
