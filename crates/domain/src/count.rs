// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::money::checked_to_decimal;
use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A manually entered count that may be shown doubled.
///
/// The base count is what is stored. While doubling is active the user sees
/// and types `base × 2`; a typed value is halved and rounded to the nearest
/// whole base unit (half away from zero).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DoubledCount {
    base: u32,
}

impl DoubledCount {
    /// Creates a count from its stored base value.
    #[must_use]
    pub const fn from_base(base: u32) -> Self {
        Self { base }
    }

    /// Interprets a value as the user typed it.
    ///
    /// # Arguments
    ///
    /// * `field` - The input field, for error messages
    /// * `displayed` - The typed value
    /// * `doubling` - Whether the value was typed doubled
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCount` if the value is negative, not a
    /// number, or too large to store.
    pub fn from_display(field: &str, displayed: f64, doubling: bool) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidCount {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        if !displayed.is_finite() {
            return Err(invalid("not a number"));
        }
        if displayed < 0.0 {
            return Err(invalid("must not be negative"));
        }

        let typed: Decimal = checked_to_decimal(displayed).ok_or_else(|| invalid("too large"))?;
        let base: Decimal = if doubling {
            typed / Decimal::TWO
        } else {
            typed
        };

        base.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .map(Self::from_base)
            .ok_or_else(|| invalid("too large"))
    }

    /// The stored base count.
    #[must_use]
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// The value to show the user.
    #[must_use]
    pub const fn display(&self, doubling: bool) -> u32 {
        if doubling {
            self.base.saturating_mul(2)
        } else {
            self.base
        }
    }

    /// The quantity to price, which is the displayed value.
    #[must_use]
    pub fn quantity(&self, doubling: bool) -> f64 {
        f64::from(self.display(doubling))
    }
}
