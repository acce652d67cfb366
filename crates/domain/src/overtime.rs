// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Overtime threshold resolution.
//!
//! The default full-day hours and the overtime threshold are both derived
//! from the day of week but are not the same figure: a weekday defaults to 7
//! hours while overtime only starts after 8.

use time::{Date, Weekday};

/// Threshold used when no log date is known.
pub const DEFAULT_OVERTIME_THRESHOLD: f64 = 8.0;

/// Threshold on Saturdays.
pub const SATURDAY_OVERTIME_THRESHOLD: f64 = 5.0;

/// Default hours to pre-fill for a full day's work.
#[must_use]
pub fn default_full_day_hours(date: Date) -> f64 {
    if date.weekday() == Weekday::Saturday {
        5.0
    } else {
        7.0
    }
}

/// Hours beyond which overtime pay codes apply.
#[must_use]
pub fn overtime_threshold(date: Option<Date>) -> f64 {
    match date {
        Some(d) if d.weekday() == Weekday::Saturday => SATURDAY_OVERTIME_THRESHOLD,
        _ => DEFAULT_OVERTIME_THRESHOLD,
    }
}

/// `max(0, worked − threshold)`.
///
/// Non-finite inputs are treated as zero.
#[must_use]
pub fn natural_overtime_hours(worked_hours: f64, threshold: f64) -> f64 {
    let worked: f64 = finite_or_zero(worked_hours);
    let threshold: f64 = finite_or_zero(threshold);
    (worked - threshold).max(0.0)
}

/// Natural overtime plus manually attested forced overtime.
#[must_use]
pub fn total_overtime_hours(worked_hours: f64, threshold: f64, forced_hours: f64) -> f64 {
    natural_overtime_hours(worked_hours, threshold) + finite_or_zero(forced_hours).max(0.0)
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
