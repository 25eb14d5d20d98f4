// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Existing-card reconciliation.
//!
//! When generation resolves a card window that another run already
//! materialized, the existing card is reconciled instead of duplicated:
//! deactivated cards are reactivated, stale resolutions are updated, and
//! unchanged cards are merely confirmed. Closed cards are never modified.
//!
//! ## Invariants
//!
//! - Reactivation resumes the workflow process only when the card's latest
//!   stage is still unfinished; a finished stage restores the state alone.
//! - A rejected process start rolls the card back to its snapshot values.
//! - Exactly one activity is reported per reconciled card, or none when a
//!   closed card is left untouched.

use crate::error::GenerationError;
use crate::ports::{
    CardStore, StoreError, WorkflowEngine, agreement_business_key, stage_process_key,
};
use crate::service::CardActivity;
use perfcard_domain::{
    AssessmentStatus, BonusPeriod, CardSnapshot, CardStage, CardState, CardStatus,
};
use tracing::{error, warn};

/// Brings a deactivated card back to life.
///
/// Consults the card's latest stage-history entry. An unfinished stage
/// means a workflow process must be resumed: the card goes `Active` (the
/// stage's status marker set to `Is processed`), and the process is started
/// in the engine; a rejected start restores the snapshot. A finished stage
/// needs no process, only the state. A card without any stage history is an
/// anomaly and is left alone.
///
/// Returns whether the card ended up active.
///
/// # Errors
///
/// Returns a [`StoreError`] when a store operation fails, including the
/// rollback write.
pub fn reactivate_card<S, E>(
    store: &mut S,
    engine: &E,
    card: &CardSnapshot,
) -> Result<bool, StoreError>
where
    S: CardStore,
    E: WorkflowEngine,
{
    let Some(last_stage) = store.last_stage_entry(card.id)? else {
        warn!(card_id = card.id, "Attempt to reactivate a card without stage history");
        return Ok(false);
    };

    if last_stage.ended_at.is_some() {
        // Stage already finished; only the state needs restoring.
        store.update_card_state(card.id, CardState::Active)?;
        return Ok(true);
    }

    let previous_assessment: Option<AssessmentStatus> = match last_stage.stage {
        CardStage::OnSetting | CardStage::OnActualization => {
            store.update_card_state_status(card.id, CardState::Active, CardStatus::IsProcessed)?;
            None
        }
        CardStage::OnAssessment => {
            let previous: AssessmentStatus = store.assessment_status(card.id)?;
            store.set_assessment_status(card.id, AssessmentStatus::IsProcessed)?;
            store.update_card_state(card.id, CardState::Active)?;
            Some(previous)
        }
    };

    match engine.start_process(
        stage_process_key(last_stage.stage),
        &agreement_business_key(card.id),
    ) {
        Ok(()) => Ok(true),
        Err(e) => {
            error!(card_id = card.id, error = %e, "Card reactivation failed");
            match last_stage.stage {
                CardStage::OnSetting | CardStage::OnActualization => {
                    store.update_card_state_status(card.id, card.state, card.status)?;
                }
                CardStage::OnAssessment => {
                    if let Some(previous) = previous_assessment {
                        store.set_assessment_status(card.id, previous)?;
                    }
                    store.update_card_state(card.id, card.state)?;
                }
            }
            Ok(false)
        }
    }
}

/// Reconciles an existing card against a freshly resolved window.
///
/// Deactivated cards are reactivated first; a successful reactivation also
/// adopts the resolved end date, bonus type, and business unit. Otherwise
/// an unchanged card is confirmed as checked, a changed non-closed card is
/// updated, and a changed closed card is left untouched with no activity.
///
/// # Errors
///
/// Returns [`GenerationError::MissingBonusType`] when the resolved bonus
/// type is unknown to the store, or a store error from any write.
pub fn reconcile_existing_card<S, E>(
    store: &mut S,
    engine: &E,
    card: &CardSnapshot,
    resolved: &BonusPeriod,
) -> Result<Option<CardActivity>, GenerationError>
where
    S: CardStore,
    E: WorkflowEngine,
{
    if !store.has_bonus_type(&resolved.bonus_type)? {
        return Err(GenerationError::MissingBonusType(
            resolved.bonus_type.clone(),
        ));
    }

    if card.state.is_deactivated() && reactivate_card(store, engine, card)? {
        store.update_card_resolution(
            card.id,
            resolved.end,
            &resolved.bonus_type,
            &resolved.business_unit,
        )?;
        return Ok(Some(CardActivity::Reactivated));
    }

    if card.date_end == resolved.end
        && card.bonus_type_key == resolved.bonus_type
        && card.business_unit == resolved.business_unit
    {
        return Ok(Some(CardActivity::Checked));
    }

    if card.state != CardState::Closed {
        store.update_card_resolution(
            card.id,
            resolved.end,
            &resolved.bonus_type,
            &resolved.business_unit,
        )?;
        return Ok(Some(CardActivity::Updated));
    }

    Ok(None)
}
