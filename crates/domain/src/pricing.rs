// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Activity pricing.
//!
//! Pricing is a pure function of one activity and the entry's inputs. It
//! never fails: an unknown rate unit or a missing quantity prices at zero so
//! that one malformed catalog entry cannot block a payroll run.

use crate::activity::Activity;
use crate::money::{self, Money};
use crate::overtime::{finite_or_zero, overtime_threshold, total_overtime_hours};
use crate::types::{LocationType, PayType, RateUnit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;

/// Values of external form fields that drive context-linked pay codes,
/// keyed by field name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextData {
    fields: BTreeMap<String, f64>,
}

impl ContextData {
    /// Creates empty context data.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field value.
    pub fn set(&mut self, field: &str, value: f64) {
        self.fields.insert(field.to_string(), value);
    }

    /// Removes a field.
    pub fn remove(&mut self, field: &str) {
        self.fields.remove(field);
    }

    /// Builder form of [`ContextData::set`].
    #[must_use]
    pub fn with(mut self, field: &str, value: f64) -> Self {
        self.set(field, value);
        self
    }

    /// Returns a field value. Non-finite values read as absent.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<f64> {
        self.fields.get(field).copied().filter(|v| v.is_finite())
    }
}

/// The entry-level inputs pricing depends on.
#[derive(Debug, Clone, Copy)]
pub struct PricingContext<'a> {
    /// Hours worked on the entry.
    pub worked_hours: f64,
    /// The log date; decides the overtime threshold.
    pub log_date: Option<Date>,
    /// Manually attested overtime added to natural overtime.
    pub forced_overtime_hours: f64,
    /// External context fields.
    pub context: &'a ContextData,
    /// The lead's location for the day, when the entry has one.
    pub location: Option<LocationType>,
}

impl<'a> PricingContext<'a> {
    /// A context with the given hours and nothing else.
    #[must_use]
    pub const fn new(worked_hours: f64, context: &'a ContextData) -> Self {
        Self {
            worked_hours,
            log_date: None,
            forced_overtime_hours: 0.0,
            context,
            location: None,
        }
    }

    /// Sets the log date.
    #[must_use]
    pub const fn on(mut self, log_date: Option<Date>) -> Self {
        self.log_date = log_date;
        self
    }

    /// Sets the forced overtime hours.
    #[must_use]
    pub const fn with_forced_overtime(mut self, hours: f64) -> Self {
        self.forced_overtime_hours = hours;
        self
    }

    /// Sets the location.
    #[must_use]
    pub const fn at(mut self, location: Option<LocationType>) -> Self {
        self.location = location;
        self
    }

    /// The overtime threshold for the log date.
    #[must_use]
    pub fn overtime_threshold(&self) -> f64 {
        overtime_threshold(self.log_date)
    }

    /// Natural plus forced overtime hours.
    #[must_use]
    pub fn overtime_hours(&self) -> f64 {
        total_overtime_hours(
            self.worked_hours,
            self.overtime_threshold(),
            self.forced_overtime_hours,
        )
    }
}

/// Computes the amount for one activity.
///
/// Unselected activities always price at zero.
///
/// # Arguments
///
/// * `activity` - The activity to price
/// * `ctx` - The entry's pricing inputs
#[must_use]
pub fn price_activity(activity: &Activity, ctx: &PricingContext<'_>) -> Money {
    if !activity.is_selected {
        return Money::ZERO;
    }

    match activity.rate_unit {
        RateUnit::Hour => {
            let hours: f64 = if activity.pay_type == PayType::Overtime {
                activity
                    .hours_applied
                    .map_or_else(|| ctx.overtime_hours(), finite_or_zero)
            } else {
                finite_or_zero(ctx.worked_hours)
            };
            money::multiply(activity.rate, hours)
        }
        RateUnit::Day | RateUnit::Bag | RateUnit::Trip => activity
            .units_produced
            .map_or(Money::ZERO, |units| money::multiply(activity.rate, units)),
        RateUnit::Percent => activity
            .units_produced
            .map_or(Money::ZERO, |base| money::percentage_of(base, activity.rate)),
        RateUnit::Fixed => Money::from_f64(activity.rate),
        RateUnit::Unknown => Money::ZERO,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::pay_code::PayCode;
    use time::macros::date;

    fn activity(pay_type: PayType, unit: RateUnit, rate: f64, selected: bool) -> Activity {
        let mut activity: Activity =
            Activity::from_pay_code(&PayCode::new("CODE", pay_type, unit, rate), rate);
        activity.is_selected = selected;
        activity
    }

    #[test]
    fn test_unselected_is_zero_for_every_unit() {
        let ctx_data: ContextData = ContextData::new();
        let ctx: PricingContext<'_> = PricingContext::new(12.0, &ctx_data);
        for unit in [
            RateUnit::Hour,
            RateUnit::Day,
            RateUnit::Bag,
            RateUnit::Trip,
            RateUnit::Percent,
            RateUnit::Fixed,
            RateUnit::Unknown,
        ] {
            for pay_type in [PayType::Base, PayType::Overtime, PayType::Tambahan] {
                let mut a: Activity = activity(pay_type, unit, 50.0, false);
                a.units_produced = Some(10.0);
                assert_eq!(price_activity(&a, &ctx), Money::ZERO);
            }
        }
    }

    #[test]
    fn test_base_hour_uses_worked_hours_without_threshold() {
        let ctx_data: ContextData = ContextData::new();
        let ctx: PricingContext<'_> = PricingContext::new(9.0, &ctx_data);
        let a: Activity = activity(PayType::Base, RateUnit::Hour, 7.5, true);
        assert_eq!(price_activity(&a, &ctx), Money::from_cents(6750));
    }

    #[test]
    fn test_natural_overtime_weekday() {
        let ctx_data: ContextData = ContextData::new();
        let ctx: PricingContext<'_> =
            PricingContext::new(9.0, &ctx_data).on(Some(date!(2026 - 08 - 31)));
        let a: Activity = activity(PayType::Overtime, RateUnit::Hour, 5.0, true);
        assert_eq!(price_activity(&a, &ctx), Money::from_cents(500));
    }

    #[test]
    fn test_natural_overtime_saturday() {
        let ctx_data: ContextData = ContextData::new();
        let ctx: PricingContext<'_> =
            PricingContext::new(9.0, &ctx_data).on(Some(date!(2026 - 08 - 29)));
        let a: Activity = activity(PayType::Overtime, RateUnit::Hour, 5.0, true);
        assert_eq!(price_activity(&a, &ctx), Money::from_cents(2000));
    }

    #[test]
    fn test_hours_applied_overrides_threshold() {
        let ctx_data: ContextData = ContextData::new();
        let ctx: PricingContext<'_> = PricingContext::new(9.0, &ctx_data);
        let mut a: Activity = activity(PayType::Overtime, RateUnit::Hour, 5.0, true);
        a.hours_applied = Some(12.5);
        assert_eq!(price_activity(&a, &ctx), Money::from_cents(6250));
    }

    #[test]
    fn test_forced_overtime_added_to_natural() {
        let ctx_data: ContextData = ContextData::new();
        let ctx: PricingContext<'_> = PricingContext::new(9.0, &ctx_data).with_forced_overtime(2.0);
        let a: Activity = activity(PayType::Overtime, RateUnit::Hour, 5.0, true);
        assert_eq!(price_activity(&a, &ctx), Money::from_cents(1500));
    }

    #[test]
    fn test_quantity_units_need_units() {
        let ctx_data: ContextData = ContextData::new();
        let ctx: PricingContext<'_> = PricingContext::new(8.0, &ctx_data);
        for unit in [RateUnit::Day, RateUnit::Bag, RateUnit::Trip] {
            let mut a: Activity = activity(PayType::Base, unit, 0.35, true);
            assert_eq!(price_activity(&a, &ctx), Money::ZERO);
            a.units_produced = Some(120.0);
            assert_eq!(price_activity(&a, &ctx), Money::from_cents(4200));
        }
    }

    #[test]
    fn test_percent_uses_units_as_base() {
        let ctx_data: ContextData = ContextData::new();
        let ctx: PricingContext<'_> = PricingContext::new(8.0, &ctx_data);
        let mut a: Activity = activity(PayType::Tambahan, RateUnit::Percent, 2.5, true);
        assert_eq!(price_activity(&a, &ctx), Money::ZERO);
        a.units_produced = Some(3000.0);
        assert_eq!(price_activity(&a, &ctx), Money::from_cents(7500));
    }

    #[test]
    fn test_fixed_ignores_hours_and_units() {
        let ctx_data: ContextData = ContextData::new();
        for hours in [0.0, 100.0] {
            let ctx: PricingContext<'_> = PricingContext::new(hours, &ctx_data);
            let mut a: Activity = activity(PayType::Tambahan, RateUnit::Fixed, 50.0, true);
            assert_eq!(price_activity(&a, &ctx), Money::from_cents(5000));
            a.units_produced = Some(7.0);
            assert_eq!(price_activity(&a, &ctx), Money::from_cents(5000));
        }
    }

    #[test]
    fn test_unknown_unit_is_zero() {
        let ctx_data: ContextData = ContextData::new();
        let ctx: PricingContext<'_> = PricingContext::new(8.0, &ctx_data);
        let mut a: Activity = activity(PayType::Base, RateUnit::Unknown, 50.0, true);
        a.units_produced = Some(3.0);
        assert_eq!(price_activity(&a, &ctx), Money::ZERO);
    }

    #[test]
    fn test_context_ignores_non_finite_values() {
        let data: ContextData = ContextData::new().with("dulang", f64::NAN).with("bags", 4.0);
        assert_eq!(data.get("dulang"), None);
        assert_eq!(data.get("bags"), Some(4.0));
        assert_eq!(data.get("missing"), None);
    }
}
