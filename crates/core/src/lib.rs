// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Performance card generation and lifecycle engine.
//!
//! The engine walks each employee's assignment history, resolves the bonus
//! stretches that deserve a card, and reconciles them against the cards the
//! store already holds: creating, updating, reactivating, or deactivating as
//! the history dictates. Side effects on the external workflow engine are
//! rolled back in the store when the engine rejects them.
//!
//! Collaborators are reached through the [`CardStore`], [`WorkflowEngine`],
//! and [`HrProvider`] traits; the engine itself performs no I/O.

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

mod deactivate;
mod error;
mod existing;
mod ports;
mod run;
mod service;

#[cfg(test)]
mod tests;

pub use deactivate::{
    DeactivationCounts, deactivate_card, deactivate_employee_cards, deactivate_unit_cards,
};
pub use error::GenerationError;
pub use existing::{reactivate_card, reconcile_existing_card};
pub use ports::{
    CardStore, EngineError, HrError, HrProvider, NewCard, StageEntry, StoreError, WorkflowEngine,
    agreement_business_key, deactivate_message_name, stage_process_key,
};
pub use run::{UnitGenerationReport, generate_cards_for_unit};
pub use service::{CardActivity, CardGenerationService, GenerationCounts};
