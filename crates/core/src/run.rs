// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-unit generation entry point.
//!
//! Fetches the unit's employees from the HR provider, runs the orchestrator
//! over each one with per-employee failure isolation, and finishes with the
//! unit-level deactivation sweep over every card no employee pass touched.

use crate::deactivate::{DeactivationCounts, deactivate_unit_cards};
use crate::error::GenerationError;
use crate::ports::{CardStore, HrProvider, WorkflowEngine};
use crate::service::CardGenerationService;
use perfcard_domain::{Employee, Period};
use std::collections::HashSet;
use tracing::{error, info};
use uuid::Uuid;

/// Result summary of one per-unit generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitGenerationReport {
    /// Cards created.
    pub created: u64,
    /// Cards updated.
    pub updated: u64,
    /// Cards confirmed unchanged.
    pub checked: u64,
    /// Cards reactivated.
    pub reactivated: u64,
    /// Cards deactivated, employee- and unit-level combined.
    pub deactivated: u64,
    /// Errors: failed record runs, failed employees, and failed
    /// deactivations combined.
    pub errors: u64,
}

/// Generates cards for every employee of a business unit.
///
/// Employee failures are logged and counted without stopping the batch.
/// After the employee loop, cards of the unit that no pass touched are
/// deactivated.
///
/// # Errors
///
/// Returns a [`GenerationError`] when the HR fetch fails or a store
/// operation outside the per-employee containment fails.
pub fn generate_cards_for_unit<S, E, H>(
    store: &mut S,
    engine: &E,
    hr: &H,
    period: &Period,
    business_unit: &str,
    task_id: Uuid,
) -> Result<UnitGenerationReport, GenerationError>
where
    S: CardStore,
    E: WorkflowEngine,
    H: HrProvider,
{
    let employees: Vec<Employee> =
        hr.employees_by_unit(business_unit, period, &period.bonus_type_keys)?;

    let mut service: CardGenerationService<'_, S, E> =
        CardGenerationService::new(store, engine, period, task_id);
    for employee in employees {
        let per_no: String = employee.per_no.clone();
        if let Err(e) = service.generate_for_employee(employee) {
            error!(per_no, error = %e, "Card generation failed for employee");
            service.counts.errors += 1;
        }
    }

    let touched: HashSet<i64> = service.touched_card_ids();
    let counts = service.counts;
    let employee_deactivation: DeactivationCounts = service.deactivation;
    drop(service);

    let mut unit_deactivation = DeactivationCounts::default();
    deactivate_unit_cards(
        store,
        engine,
        period,
        business_unit,
        &touched,
        &mut unit_deactivation,
    )?;

    let report = UnitGenerationReport {
        created: counts.created,
        updated: counts.updated,
        checked: counts.checked,
        reactivated: counts.reactivated,
        deactivated: employee_deactivation.deactivated + unit_deactivation.deactivated,
        errors: counts.errors + employee_deactivation.errors + unit_deactivation.errors,
    };
    info!(
        business_unit,
        created = report.created,
        updated = report.updated,
        deactivated = report.deactivated,
        reactivated = report.reactivated,
        errors = report.errors,
        checked = report.checked,
        "Card generation finished for unit"
    );
    Ok(report)
}
