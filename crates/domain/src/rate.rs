// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::pay_code::PayCode;
use crate::types::DayType;

/// Picks the rate for a pay code on a day type.
///
/// An override for the day type always wins over the base rate.
#[must_use]
pub fn resolve_rate(pay_code: &PayCode, day_type: DayType) -> f64 {
    let (base, override_rate) = match day_type {
        DayType::Umum => (pay_code.rates.umum, pay_code.overrides.umum),
        DayType::Ahad => (pay_code.rates.ahad, pay_code.overrides.ahad),
        DayType::Biasa => (pay_code.rates.biasa, pay_code.overrides.biasa),
    };
    override_rate.unwrap_or(base)
}
