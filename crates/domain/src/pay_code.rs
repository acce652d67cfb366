// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{CatalogSource, PayCodeId, PayType, RateUnit};
use serde::{Deserialize, Serialize};

/// Base rates per day type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DayTypeRates {
    /// Ordinary day rate.
    pub biasa: f64,
    /// Sunday rate.
    pub ahad: f64,
    /// Public holiday rate.
    pub umum: f64,
}

impl DayTypeRates {
    /// The same rate on every day type.
    #[must_use]
    pub const fn flat(rate: f64) -> Self {
        Self {
            biasa: rate,
            ahad: rate,
            umum: rate,
        }
    }
}

/// Optional per-day-type override rates. An override always wins over the
/// base rate for the same day type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RateOverrides {
    /// Ordinary day override.
    #[serde(default)]
    pub biasa: Option<f64>,
    /// Sunday override.
    #[serde(default)]
    pub ahad: Option<f64>,
    /// Public holiday override.
    #[serde(default)]
    pub umum: Option<f64>,
}

/// A unit of compensation as supplied by the catalog collaborator.
///
/// Pay codes are immutable reference data for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayCode {
    /// The pay code identifier.
    pub id: PayCodeId,
    /// Human-readable description.
    pub description: String,
    /// What the pay code compensates.
    pub pay_type: PayType,
    /// The quantity basis for pricing.
    pub rate_unit: RateUnit,
    /// Base rates per day type.
    pub rates: DayTypeRates,
    /// Override rates per day type.
    #[serde(default)]
    pub overrides: RateOverrides,
    /// Whether a quantity must be entered before the pay code can be priced.
    #[serde(default)]
    pub requires_units_input: bool,
    /// Whether the pay code is selected by default on a new entry.
    #[serde(default)]
    pub default_selected: bool,
    /// Name of the external context field that drives the quantity, if any.
    #[serde(default)]
    pub context_field: Option<String>,
    /// Catalog layer this entry came from. Set by the catalog merge.
    #[serde(default)]
    pub source: CatalogSource,
}

impl PayCode {
    /// Creates a pay code with flat rates and no flags set.
    ///
    /// # Arguments
    ///
    /// * `id` - The pay code identifier
    /// * `pay_type` - What the pay code compensates
    /// * `rate_unit` - The quantity basis
    /// * `rate` - The rate used on every day type
    #[must_use]
    pub fn new(id: &str, pay_type: PayType, rate_unit: RateUnit, rate: f64) -> Self {
        Self {
            id: PayCodeId::new(id),
            description: id.to_string(),
            pay_type,
            rate_unit,
            rates: DayTypeRates::flat(rate),
            overrides: RateOverrides::default(),
            requires_units_input: false,
            default_selected: false,
            context_field: None,
            source: CatalogSource::Job,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Sets the per-day-type base rates.
    #[must_use]
    pub const fn with_rates(mut self, rates: DayTypeRates) -> Self {
        self.rates = rates;
        self
    }

    /// Sets the per-day-type override rates.
    #[must_use]
    pub const fn with_overrides(mut self, overrides: RateOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Marks the pay code as selected by default.
    #[must_use]
    pub const fn selected_by_default(mut self) -> Self {
        self.default_selected = true;
        self
    }

    /// Marks the pay code as needing a quantity.
    #[must_use]
    pub const fn requiring_units(mut self) -> Self {
        self.requires_units_input = true;
        self
    }

    /// Links the quantity to a named context field.
    #[must_use]
    pub fn linked_to(mut self, context_field: &str) -> Self {
        self.context_field = Some(context_field.to_string());
        self
    }

    /// Whether the quantity is driven by an external context field.
    #[must_use]
    pub const fn is_context_linked(&self) -> bool {
        self.context_field.is_some()
    }
}
