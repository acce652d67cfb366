// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::money::Money;
use crate::pay_code::PayCode;
use crate::types::{ActivitySource, PayCodeId, PayType, RateUnit, SelectionBasis};
use serde::{Deserialize, Serialize};

/// A priced pay code on one work entry.
///
/// Activities are regenerated wholesale whenever an entry is rebuilt.
/// Callers change the entry's inputs, never the activities themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// The pay code this activity prices.
    pub pay_code_id: PayCodeId,
    /// Description copied from the pay code.
    pub description: String,
    /// What the pay code compensates.
    pub pay_type: PayType,
    /// The quantity basis.
    pub rate_unit: RateUnit,
    /// The rate resolved for the current day type.
    pub rate: f64,
    /// Whether the activity counts towards pay.
    pub is_selected: bool,
    /// Why the activity is (un)selected.
    #[serde(default)]
    pub selection_basis: SelectionBasis,
    /// Quantity for Day/Bag/Trip units, or the base amount for Percent.
    pub units_produced: Option<f64>,
    /// Overtime hours computed outside the natural threshold rule.
    pub hours_applied: Option<f64>,
    /// The priced amount.
    pub calculated_amount: Money,
    /// Whether the quantity comes from an external context field.
    pub is_context_linked: bool,
    /// The context field name for context-linked activities.
    #[serde(default)]
    pub context_field: Option<String>,
    /// Whether a quantity is expected.
    #[serde(default)]
    pub requires_units_input: bool,
    /// Where the activity originated.
    pub source: ActivitySource,
}

impl Activity {
    /// Creates an unselected, unpriced activity from a pay code.
    #[must_use]
    pub fn from_pay_code(pay_code: &PayCode, rate: f64) -> Self {
        Self {
            pay_code_id: pay_code.id.clone(),
            description: pay_code.description.clone(),
            pay_type: pay_code.pay_type,
            rate_unit: pay_code.rate_unit,
            rate,
            is_selected: false,
            selection_basis: SelectionBasis::Default,
            units_produced: None,
            hours_applied: None,
            calculated_amount: Money::ZERO,
            is_context_linked: pay_code.is_context_linked(),
            context_field: pay_code.context_field.clone(),
            requires_units_input: pay_code.requires_units_input,
            source: ActivitySource::from(pay_code.source),
        }
    }

    /// Sets the selection and records why.
    pub fn select(&mut self, selected: bool, basis: SelectionBasis) {
        self.is_selected = selected;
        self.selection_basis = basis;
    }
}

/// Finds an activity by pay code.
#[must_use]
pub fn find_activity<'a>(
    activities: &'a [Activity],
    pay_code_id: &PayCodeId,
) -> Option<&'a Activity> {
    activities.iter().find(|a| &a.pay_code_id == pay_code_id)
}

/// Finds an activity by pay code for mutation.
pub fn find_activity_mut<'a>(
    activities: &'a mut [Activity],
    pay_code_id: &PayCodeId,
) -> Option<&'a mut Activity> {
    activities.iter_mut().find(|a| &a.pay_code_id == pay_code_id)
}

/// Total of the selected activities' amounts.
#[must_use]
pub fn total_amount(activities: &[Activity]) -> Money {
    crate::money::sum(
        activities
            .iter()
            .filter(|a| a.is_selected)
            .map(|a| a.calculated_amount),
    )
}

/// The activity list exactly as it was last persisted for a work entry.
///
/// Only selected activities are ever persisted. A snapshot is captured once
/// when an existing log is loaded for editing and is only read afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedActivitySnapshot {
    activities: Vec<Activity>,
}

impl SavedActivitySnapshot {
    /// Captures a snapshot.
    #[must_use]
    pub const fn new(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    /// The saved record for a pay code, if one was persisted.
    #[must_use]
    pub fn get(&self, pay_code_id: &PayCodeId) -> Option<&Activity> {
        find_activity(&self.activities, pay_code_id)
    }

    /// All saved activities.
    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Whether the snapshot holds no activities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}
