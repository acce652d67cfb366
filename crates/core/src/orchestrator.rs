// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Batch recalculation.
//!
//! Drives price → select → cascade for every entry in dependency order: a
//! lead's rows are always rebuilt before any follower reads them. A failure on
//! one entry is recorded and the rest of the batch still completes.

use crate::apply::apply;
use crate::cascade::{CascadeRules, LeadView, propagate_follower_from_lead};
use crate::command::Command;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::reference::{Collaborators, ProductSale};
use crate::selection::{EntryRebuild, rebuild_activities_for_entry};
use crate::state::{Batch, RoleLink, WorkEntry};
use paylog_domain::{
    Activity, CatalogOptions, EffectiveCatalog, EmployeeId, PayCode, PricingContext,
    WorkEntryKey, WorkerRole, merge_catalog,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// One entry that could not be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    /// The entry.
    pub key: WorkEntryKey,
    /// Why it failed.
    pub error: EngineError,
}

/// The result of a recalculation.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// The recalculated batch. Failed entries have no activities.
    pub batch: Batch,
    /// Entries that could not be rebuilt.
    pub failures: Vec<EntryFailure>,
}

impl BatchOutcome {
    /// Whether every entry was rebuilt.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Rebuilds every entry in a batch.
///
/// Unselected entries end with an empty activity list. Employees caught in a
/// cycle of role links fail with `EngineError::RoleCycle`.
///
/// # Arguments
///
/// * `batch` - The batch to recalculate (immutable)
/// * `collaborators` - Reference data
/// * `config` - Engine configuration
#[must_use]
pub fn recalculate(
    batch: &Batch,
    collaborators: &Collaborators<'_>,
    config: &EngineConfig,
) -> BatchOutcome {
    let mut next: Batch = batch.clone();
    let mut failures: Vec<EntryFailure> = Vec::new();
    let (order, cyclic) = lead_first_order(batch);

    for employee in &cyclic {
        warn!(employee = %employee, "Role links form a cycle");
        for key in employee_keys(&next, employee) {
            clear(&mut next, &key);
            failures.push(EntryFailure {
                key,
                error: EngineError::RoleCycle(employee.clone()),
            });
        }
    }

    for employee in &order {
        for key in employee_keys(&next, employee) {
            match rebuild_entry(&next, &key, collaborators, config) {
                Ok(activities) => {
                    if let Some(entry) = next.entries.get_mut(&key) {
                        entry.activities = activities;
                    }
                }
                Err(error) => {
                    warn!(entry = %key, %error, "Failed to rebuild work entry");
                    clear(&mut next, &key);
                    failures.push(EntryFailure { key, error });
                }
            }
        }
    }

    info!(
        entries = next.entries.len(),
        failures = failures.len(),
        total = %next.total_pay(),
        "Recalculated batch"
    );

    BatchOutcome {
        batch: next,
        failures,
    }
}

/// Applies a command, then recalculates.
///
/// # Errors
///
/// Returns an error if the command is rejected. Entry failures during the
/// recalculation are reported in the outcome instead.
pub fn apply_and_recalculate(
    batch: &Batch,
    command: Command,
    collaborators: &Collaborators<'_>,
    config: &EngineConfig,
) -> Result<BatchOutcome, EngineError> {
    let next: Batch = apply(batch, command)?;
    Ok(recalculate(&next, collaborators, config))
}

fn rebuild_entry(
    batch: &Batch,
    key: &WorkEntryKey,
    collaborators: &Collaborators<'_>,
    config: &EngineConfig,
) -> Result<Vec<Activity>, EngineError> {
    let Some(entry) = batch.entries.get(key) else {
        return Err(EngineError::UnknownEntry(key.clone()));
    };
    if !entry.selected {
        return Ok(Vec::new());
    }

    let job_codes: Vec<PayCode> = collaborators.pay_codes.job_pay_codes(&key.job)?;
    let employee_codes: Vec<PayCode> = collaborators
        .pay_codes
        .employee_pay_codes(&key.employee, &key.job)?;
    let catalog: EffectiveCatalog = merge_catalog(
        &job_codes,
        &employee_codes,
        CatalogOptions::for_role(entry.role),
    );

    let activities: Vec<Activity> = rebuild_activities_for_entry(&EntryRebuild {
        catalog: &catalog,
        snapshot: batch.saved.get(key),
        mode: batch.mode,
        day_type: batch.day_type,
        log_date: Some(batch.log_date),
        context: &batch.context,
        inputs: &entry.inputs,
        special_codes: &config.special_codes,
        role_codes: &config.role_codes,
    });

    if entry.role != WorkerRole::Follower {
        return Ok(activities);
    }

    let link: Option<&RoleLink> = batch.role_links.get(&key.employee);
    let lead: Option<(&WorkEntry, &EmployeeId)> = link.and_then(|link| {
        batch
            .entries_for(&link.lead)
            .find(|(_, lead_entry)| lead_entry.selected)
            .map(|(_, lead_entry)| (lead_entry, &link.lead))
    });

    let sales: Vec<ProductSale> = match lead {
        Some((_, lead_id)) => collaborators
            .product_sales
            .product_sales(lead_id, batch.log_date)?,
        None => {
            debug!(entry = %key, "Follower has no selected lead, clearing projections");
            Vec::new()
        }
    };

    let view: Option<LeadView<'_>> = lead.map(|(lead_entry, _)| LeadView {
        activities: &lead_entry.activities,
        location: lead_entry.inputs.location,
        sales: &sales,
    });
    let ctx: PricingContext<'_> = entry
        .inputs
        .pricing_context(Some(batch.log_date), &batch.context);

    Ok(propagate_follower_from_lead(
        view,
        activities,
        &link.map(RoleLink::follower_inputs).unwrap_or_default(),
        &CascadeRules::from_config(config),
        &ctx,
    ))
}

/// Orders employees so that every lead precedes its followers.
///
/// Returns the order and the employees that sit on or behind a cycle of
/// links. Ties are broken by employee id so the order is deterministic.
fn lead_first_order(batch: &Batch) -> (Vec<EmployeeId>, BTreeSet<EmployeeId>) {
    let employees: BTreeSet<EmployeeId> = batch.employees();
    let mut pending_leads: BTreeMap<&EmployeeId, usize> =
        employees.iter().map(|employee| (employee, 0)).collect();
    let mut followers: BTreeMap<&EmployeeId, Vec<&EmployeeId>> = BTreeMap::new();

    for (follower, link) in &batch.role_links {
        if employees.contains(follower) && employees.contains(&link.lead) {
            if let Some(count) = pending_leads.get_mut(follower) {
                *count += 1;
            }
            followers.entry(&link.lead).or_default().push(follower);
        }
    }

    let mut ready: BTreeSet<&EmployeeId> = pending_leads
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(employee, _)| *employee)
        .collect();
    let mut order: Vec<EmployeeId> = Vec::with_capacity(employees.len());

    while let Some(employee) = ready.pop_first() {
        order.push(employee.clone());
        for follower in followers.get(employee).into_iter().flatten() {
            if let Some(count) = pending_leads.get_mut(follower) {
                *count -= 1;
                if *count == 0 {
                    ready.insert(*follower);
                }
            }
        }
    }

    let cyclic: BTreeSet<EmployeeId> = employees
        .iter()
        .filter(|employee| !order.contains(*employee))
        .cloned()
        .collect();
    (order, cyclic)
}

fn employee_keys(batch: &Batch, employee: &EmployeeId) -> Vec<WorkEntryKey> {
    batch
        .entries_for(employee)
        .map(|(key, _)| key.clone())
        .collect()
}

fn clear(batch: &mut Batch, key: &WorkEntryKey) {
    if let Some(entry) = batch.entries.get_mut(key) {
        entry.activities.clear();
    }
}
