// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fixed-point money arithmetic.
//!
//! Every monetary value in the engine is an integer count of cents. Products
//! and percentages are computed in exact decimal arithmetic and rounded to the
//! nearest cent exactly once (half away from zero). No other module performs
//! floating-point money math.
//!
//! None of these functions panic. Non-finite inputs are treated as zero and an
//! out-of-range result collapses to zero with a warning.

use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// A two-decimal monetary amount stored as whole cents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(from = "f64", into = "f64")]
pub struct Money {
    cents: i64,
}

impl Money {
    /// Zero.
    pub const ZERO: Self = Self { cents: 0 };

    /// Creates an amount from a count of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// Whether the amount is zero once rounded to cents.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Rounds a floating-point amount to the nearest cent.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        Self::from_decimal(to_decimal(value))
    }

    /// Returns the two-decimal value.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        Decimal::new(self.cents, 2).to_f64().unwrap_or(0.0)
    }

    /// Returns the amount as an exact decimal.
    #[must_use]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.cents, 2)
    }

    /// Adds two amounts, saturating at the `i64` cent range.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self {
            cents: self.cents.saturating_add(other.cents),
        }
    }

    fn from_decimal(value: Decimal) -> Self {
        let rounded: Decimal =
            value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        match rounded
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
        {
            Some(cents) => Self { cents },
            None => {
                warn!(%value, "Monetary value out of range, treating as zero");
                Self::ZERO
            }
        }
    }
}

impl From<f64> for Money {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<Money> for f64 {
    fn from(value: Money) -> Self {
        value.to_f64()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = self.saturating_add(other);
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

/// Converts a float to an exact decimal using its shortest round-trip
/// representation, so `10.01` becomes exactly `10.01`.
///
/// Returns `None` for NaN, infinities and magnitudes too large for a decimal.
#[must_use]
pub fn checked_to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64_retain(value))
        // Below the smallest representable step.
        .or_else(|| (value.abs() < 1.0).then_some(Decimal::ZERO))
}

/// Like [`checked_to_decimal`], but NaN and infinities become zero and an
/// out-of-range value becomes zero with a warning.
#[must_use]
pub fn to_decimal(value: f64) -> Decimal {
    checked_to_decimal(value).unwrap_or_else(|| {
        if value.is_finite() {
            warn!(value, "Value outside the decimal range, treating as zero");
        }
        Decimal::ZERO
    })
}

/// `rate × quantity`, rounded to the nearest cent once.
#[must_use]
pub fn multiply(rate: f64, quantity: f64) -> Money {
    to_decimal(rate)
        .checked_mul(to_decimal(quantity))
        .map_or_else(
            || {
                warn!(rate, quantity, "Overflow multiplying rate, treating as zero");
                Money::ZERO
            },
            Money::from_decimal,
        )
}

/// `base × pct / 100`, rounded to the nearest cent once.
#[must_use]
pub fn percentage_of(base: f64, pct: f64) -> Money {
    to_decimal(base)
        .checked_mul(to_decimal(pct))
        .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
        .map_or_else(
            || {
                warn!(base, pct, "Overflow computing percentage, treating as zero");
                Money::ZERO
            },
            Money::from_decimal,
        )
}

/// Sums already-rounded amounts. Exact; no rounding happens here.
#[must_use]
pub fn sum<I>(amounts: I) -> Money
where
    I: IntoIterator<Item = Money>,
{
    amounts.into_iter().sum()
}

/// Rounds a float to two decimals (half away from zero).
#[must_use]
pub fn round2(value: f64) -> f64 {
    Money::from_f64(value).to_f64()
}

/// Whether a float is zero once rounded to two decimals.
#[must_use]
pub fn is_effectively_zero(value: f64) -> bool {
    Money::from_f64(value).is_zero()
}
