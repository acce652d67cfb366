// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scenario documents and the reports printed for them.
//!
//! A scenario is one JSON document holding a batch, the reference data it is
//! priced against, and an optional list of commands to replay before the
//! final recalculation.

use color_eyre::eyre::{Context, Result};
use paylog::{
    Batch, BatchOutcome, Collaborators, Command, EngineConfig, Holiday, HolidayCalendar,
    InMemoryReference, LeaveBalanceProvider, ReferenceCache, apply, recalculate,
};
use paylog_domain::{
    DayType, EmployeeId, LeaveAvailability, LeaveBalances, LeaveChoice, LeaveType, Money,
    WorkEntryKey, choose_leave_type, resolve_leave_eligibility,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use time::Date;
use tracing::{debug, info};

/// A batch plus everything needed to price it.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// The day's work log.
    pub batch: Batch,
    /// Pay codes, holidays, leave balances and product sales.
    #[serde(default)]
    pub reference: InMemoryReference,
    /// Commands replayed in order before the final recalculation.
    #[serde(default)]
    pub commands: Vec<Command>,
}

/// Reads and parses a JSON document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse as `T`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw: String = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).wrap_err_with(|| format!("failed to parse {}", path.display()))
}

/// Loads the engine configuration, falling back to defaults.
///
/// # Errors
///
/// Returns an error if a path is given and the file cannot be loaded.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    path.map_or_else(
        || {
            debug!("No configuration file, using defaults");
            Ok(EngineConfig::default())
        },
        load_json,
    )
}

/// An entry that could not be priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    /// The entry.
    pub key: WorkEntryKey,
    /// The rendered error.
    pub error: String,
}

/// Output of the `recalculate` subcommand.
#[derive(Debug, Clone, Serialize)]
pub struct RecalculationReport {
    /// The recalculated batch.
    pub batch: Batch,
    /// Entries that could not be priced.
    pub failures: Vec<FailureReport>,
    /// Amount payable across the batch.
    pub total_pay: Money,
    /// Whether the result differs from the saved snapshots.
    pub unsaved_changes: bool,
}

impl From<BatchOutcome> for RecalculationReport {
    fn from(outcome: BatchOutcome) -> Self {
        let failures: Vec<FailureReport> = outcome
            .failures
            .into_iter()
            .map(|failure| FailureReport {
                key: failure.key,
                error: failure.error.to_string(),
            })
            .collect();
        Self {
            total_pay: outcome.batch.total_pay(),
            unsaved_changes: outcome.batch.has_unsaved_changes(),
            batch: outcome.batch,
            failures,
        }
    }
}

/// Serves the scenario's pay codes through a cache with the configured
/// staleness window.
#[must_use]
pub fn pay_code_cache(
    reference: &InMemoryReference,
    config: &EngineConfig,
) -> ReferenceCache<InMemoryReference> {
    debug!(
        staleness_secs = config.cache_staleness_secs,
        "Caching reference pay codes"
    );
    ReferenceCache::new(reference.clone(), config.cache_staleness())
}

/// Replays the scenario's commands and recalculates the result.
///
/// When `derive_day_type` is set the batch's day type is replaced by the one
/// the holiday calendar gives for the log date.
///
/// # Errors
///
/// Returns an error naming the first command that was rejected.
pub fn run_recalculation(
    scenario: Scenario,
    config: &EngineConfig,
    derive_day_type: bool,
) -> Result<RecalculationReport> {
    let Scenario {
        mut batch,
        reference,
        commands,
    } = scenario;

    if derive_day_type {
        let day_type: DayType = reference.day_type(batch.log_date);
        debug!(log_date = %batch.log_date, %day_type, "Derived day type from calendar");
        batch.day_type = day_type;
    }

    for (index, command) in commands.into_iter().enumerate() {
        batch = apply(&batch, command).wrap_err_with(|| format!("command {index} rejected"))?;
    }

    let cache: ReferenceCache<InMemoryReference> = pay_code_cache(&reference, config);
    let collaborators: Collaborators<'_> = Collaborators {
        pay_codes: &cache,
        product_sales: &reference,
    };
    let outcome: BatchOutcome = recalculate(&batch, &collaborators, config);
    info!(
        failures = outcome.failures.len(),
        total = %outcome.batch.total_pay(),
        "Scenario recalculated"
    );
    Ok(RecalculationReport::from(outcome))
}

/// Eligibility for one leave category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    /// The category.
    pub leave_type: LeaveType,
    /// Its eligibility on the log date.
    #[serde(flatten)]
    pub availability: LeaveAvailability,
}

/// Output of the `leave` subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveReport {
    /// The employee.
    pub employee: EmployeeId,
    /// The log date.
    pub log_date: Date,
    /// The holiday on the log date, if any.
    pub holiday: Option<Holiday>,
    /// Every category in preference order.
    pub categories: Vec<CategoryReport>,
    /// The category that would be taken.
    pub choice: LeaveChoice,
}

/// Resolves which leave category an employee would take on the log date.
///
/// # Errors
///
/// Returns an error if the employee has no balances on record or no
/// applicable category has days remaining.
pub fn leave_report(scenario: &Scenario, employee: &EmployeeId) -> Result<LeaveReport> {
    let log_date: Date = scenario.batch.log_date;
    let reference: &InMemoryReference = &scenario.reference;
    let holiday: Option<Holiday> = reference.holiday(log_date);
    let is_holiday: bool = holiday.is_some();

    let balances: LeaveBalances = reference
        .leave_balances(employee, log_date.year())
        .wrap_err_with(|| format!("no leave balances for {employee}"))?;

    let categories: Vec<CategoryReport> = LeaveType::PREFERENCE
        .into_iter()
        .map(|leave_type| CategoryReport {
            leave_type,
            availability: resolve_leave_eligibility(&balances, leave_type, is_holiday),
        })
        .collect();

    let choice: LeaveChoice = choose_leave_type(&balances, is_holiday)
        .wrap_err_with(|| format!("{employee} cannot go on leave on {log_date}"))?;

    Ok(LeaveReport {
        employee: employee.clone(),
        log_date,
        holiday,
        categories,
        choice,
    })
}
