// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-employee card generation orchestrator.
//!
//! Walks an employee's assignment history in order, groups it into runs of
//! records belonging to the same seat (or split only by technical reasons),
//! and raises one card-creation intent per run. Quit handling happens
//! first: an employee who left for good only has their cards deactivated,
//! and an employee who left and came back has the pre-quit cards settled
//! before the fresh records are processed.
//!
//! ## Invariants
//!
//! - A failed run counts one error and never aborts the employee's other
//!   runs.
//! - Every card this run creates or confirms is remembered per employee;
//!   the closing deactivation pass skips exactly those cards.
//! - Re-running generation over unchanged data creates nothing new: cards
//!   found with this run's task id are confirmed silently.

use crate::deactivate::{DeactivationCounts, deactivate_employee_cards};
use crate::error::GenerationError;
use crate::existing::reconcile_existing_card;
use crate::ports::{CardStore, NewCard, StoreError, WorkflowEngine};
use chrono::NaiveDate;
use perfcard_domain::{
    BonusPeriod, Employee, HistoricalRecord, Period, QuitEvent, find_quit_events, is_suited,
    last_genuine_termination, normalize_hire_dates, resolve_card_periods,
};
use std::collections::{HashMap, HashSet};
use tracing::error;
use uuid::Uuid;

/// What generation did with one resolved card window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardActivity {
    /// A card was created.
    Created,
    /// An existing card's resolution was rewritten.
    Updated,
    /// A deactivated card was brought back.
    Reactivated,
    /// An existing card already matched.
    Checked,
}

/// Aggregated counters of a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationCounts {
    /// Cards created.
    pub created: u64,
    /// Cards updated.
    pub updated: u64,
    /// Cards reactivated.
    pub reactivated: u64,
    /// Cards confirmed unchanged.
    pub checked: u64,
    /// Failed record runs.
    pub errors: u64,
}

impl GenerationCounts {
    /// Records one reconciliation outcome.
    pub fn record(&mut self, activity: CardActivity) {
        match activity {
            CardActivity::Created => self.created += 1,
            CardActivity::Updated => self.updated += 1,
            CardActivity::Reactivated => self.reactivated += 1,
            CardActivity::Checked => self.checked += 1,
        }
    }
}

/// Generates cards for one period, one employee at a time.
pub struct CardGenerationService<'a, S, E> {
    store: &'a mut S,
    engine: &'a E,
    period: &'a Period,
    task_id: Uuid,
    /// Outcome counters across all employees processed so far.
    pub counts: GenerationCounts,
    /// Deactivation counters across all employee-level passes.
    pub deactivation: DeactivationCounts,
    employee_cards: HashMap<String, HashSet<i64>>,
}

impl<'a, S, E> CardGenerationService<'a, S, E>
where
    S: CardStore,
    E: WorkflowEngine,
{
    /// Creates a service for one generation run over `period`.
    pub fn new(store: &'a mut S, engine: &'a E, period: &'a Period, task_id: Uuid) -> Self {
        Self {
            store,
            engine,
            period,
            task_id,
            counts: GenerationCounts::default(),
            deactivation: DeactivationCounts::default(),
            employee_cards: HashMap::new(),
        }
    }

    /// Union of every card id this run created or confirmed, across all
    /// employees.
    #[must_use]
    pub fn touched_card_ids(&self) -> HashSet<i64> {
        self.employee_cards.values().flatten().copied().collect()
    }

    /// Generates cards for one employee.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when a store operation outside the per-run
    /// containment fails. Per-run failures are counted, not returned.
    pub fn generate_for_employee(&mut self, employee: Employee) -> Result<(), StoreError> {
        let per_no: String = employee.per_no;
        let mut records: Vec<HistoricalRecord> = employee
            .historical_records
            .into_iter()
            .filter(|record| record.position.has_recognized_method())
            .collect();

        let quit_events: Vec<QuitEvent> = find_quit_events(&records, self.period);
        normalize_hire_dates(&mut records);

        if !quit_events.is_empty() {
            let last_for_employee: Option<&HistoricalRecord> =
                records.iter().rev().find(|record| record.per_no == per_no);
            if last_for_employee.is_some_and(|record| record.position.is_fired()) {
                // The history ends with the quit: nothing to create.
                self.run_employee_deactivation(&per_no, &quit_events, &HashSet::new())?;
                return Ok(());
            }

            // Quit and returned: settle the pre-quit cards, then continue
            // with the fresh records only.
            if let Some((index, fired)) = last_genuine_termination(&records) {
                let exclude: HashSet<i64> = match fired.fire_date {
                    Some(fire_date) => self
                        .store
                        .cards_ending_on_or_before(self.period.id, &per_no, fire_date)?
                        .into_iter()
                        .collect(),
                    None => HashSet::new(),
                };
                self.run_employee_deactivation(&per_no, &quit_events, &exclude)?;
                records.drain(..=index);
            }
        }

        let mut run: Vec<HistoricalRecord> = Vec::new();
        for record in records {
            if record.business_to < self.period.date_start || record.per_no != per_no {
                continue;
            }
            if record.business_from > self.period.date_end {
                break;
            }
            if let Some(prev) = run.last() {
                let same_seat: bool = prev.division.unit == record.division.unit
                    && prev.position.staff_position_id == record.position.staff_position_id;
                let technical_split: bool =
                    record.is_technical_change() && prev.per_no == record.per_no;
                if !(same_seat || technical_split) {
                    self.flush_run(&per_no, &run);
                    run.clear();
                }
            }
            run.push(record);
        }
        if !run.is_empty() {
            self.flush_run(&per_no, &run);
        }

        let touched: HashSet<i64> = self.employee_cards.get(&per_no).cloned().unwrap_or_default();
        self.run_employee_deactivation(&per_no, &quit_events, &touched)
    }

    fn run_employee_deactivation(
        &mut self,
        per_no: &str,
        quit_events: &[QuitEvent],
        exclude: &HashSet<i64>,
    ) -> Result<(), StoreError> {
        deactivate_employee_cards(
            self.store,
            self.engine,
            self.period,
            per_no,
            quit_events,
            exclude,
            &mut self.deactivation,
        )
    }

    fn flush_run(&mut self, per_no: &str, run: &[HistoricalRecord]) {
        if let Err(e) = self.intent_to_create_card(per_no, run) {
            error!(per_no, error = %e, "Card generation run failed");
            self.counts.errors += 1;
        }
    }

    fn intent_to_create_card(
        &mut self,
        per_no: &str,
        run: &[HistoricalRecord],
    ) -> Result<(), GenerationError> {
        let first: &HistoricalRecord = run.first().ok_or(GenerationError::EmptyRun)?;
        let last: &HistoricalRecord = run.last().ok_or(GenerationError::EmptyRun)?;
        let window_start: NaiveDate = self.period.date_start.max(first.business_from);
        let window_end: NaiveDate = self.period.date_end.min(last.business_to);

        let resolved: Vec<BonusPeriod> =
            resolve_card_periods(run, self.period, (window_start, window_end));
        for dates in resolved {
            if !is_suited(run, self.period, (dates.start, dates.end)) {
                continue;
            }
            match self.store.find_card(self.period.id, per_no, dates.start)? {
                Some(card) if card.generation_task_id == Some(self.task_id) => {
                    // This run already made that card; nothing to redo.
                    self.touch(per_no, card.id);
                }
                Some(card) => {
                    let activity =
                        reconcile_existing_card(self.store, self.engine, &card, &dates)?;
                    if let Some(activity) = activity {
                        self.counts.record(activity);
                    }
                    self.touch(per_no, card.id);
                }
                None => {
                    if !self.store.has_bonus_type(&dates.bonus_type)? {
                        return Err(GenerationError::MissingBonusType(dates.bonus_type));
                    }
                    let card_id: i64 = self.store.create_card(&NewCard {
                        per_no: per_no.to_string(),
                        business_unit: dates.business_unit.clone(),
                        bonus_type_key: dates.bonus_type.clone(),
                        period_id: self.period.id,
                        date_start: dates.start,
                        date_end: dates.end,
                        generation_task_id: self.task_id,
                    })?;
                    self.counts.record(CardActivity::Created);
                    self.touch(per_no, card_id);
                }
            }
        }
        Ok(())
    }

    fn touch(&mut self, per_no: &str, card_id: i64) {
        self.employee_cards
            .entry(per_no.to_string())
            .or_default()
            .insert(card_id);
    }
}
