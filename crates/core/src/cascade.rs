// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lead → follower propagation.
//!
//! A follower's location allowances and commissions are projections of the
//! lead's day. They are re-derived in full on every recompute; anything
//! previously on those activities is overwritten.

use crate::config::{BagSlot, CommissionTable, EngineConfig, RoleCodes};
use crate::reference::ProductSale;
use crate::selection::toggle_location_allowances;
use paylog_domain::{
    Activity, DoubledCount, LocationType, PayCodeId, PricingContext, SelectionBasis,
    find_activity, find_activity_mut, price_activity,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// The two manually entered bag counts on a follower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualBagCounts {
    /// Drives the first bag-count commission.
    pub first: DoubledCount,
    /// Drives the second bag-count commission.
    pub second: DoubledCount,
}

impl ManualBagCounts {
    /// The count for a slot.
    #[must_use]
    pub const fn get(&self, slot: BagSlot) -> DoubledCount {
        match slot {
            BagSlot::First => self.first,
            BagSlot::Second => self.second,
        }
    }

    /// Replaces the count for a slot.
    pub const fn set(&mut self, slot: BagSlot, count: DoubledCount) {
        match slot {
            BagSlot::First => self.first = count,
            BagSlot::Second => self.second = count,
        }
    }
}

/// The follower's own cascade settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FollowerInputs {
    /// Doubles every product and bag quantity.
    pub doubling: bool,
    /// Manually entered bag counts.
    pub bag_counts: ManualBagCounts,
}

/// What the follower can see of a selected lead.
#[derive(Debug, Clone, Copy)]
pub struct LeadView<'a> {
    /// The lead's recomputed activities.
    pub activities: &'a [Activity],
    /// The lead's chosen location, when set explicitly.
    pub location: Option<LocationType>,
    /// The lead's product sales for the work date.
    pub sales: &'a [ProductSale],
}

impl LeadView<'_> {
    /// The lead's location: the explicit choice, else whichever allowance the
    /// lead has selected.
    #[must_use]
    pub fn resolved_location(&self, role_codes: &RoleCodes) -> Option<LocationType> {
        self.location.or_else(|| {
            [LocationType::Local, LocationType::Outstation]
                .into_iter()
                .find(|location| {
                    find_activity(self.activities, role_codes.allowance_for(*location))
                        .is_some_and(|a| a.is_selected)
                })
        })
    }
}

/// The configuration the cascade reads.
#[derive(Debug, Clone, Copy)]
pub struct CascadeRules<'a> {
    /// Allowance and bag-count pay codes.
    pub role_codes: &'a RoleCodes,
    /// Product → commission mapping.
    pub commission_table: &'a CommissionTable,
}

impl<'a> CascadeRules<'a> {
    /// Borrows the cascade rules from an engine configuration.
    #[must_use]
    pub const fn from_config(config: &'a EngineConfig) -> Self {
        Self {
            role_codes: &config.role_codes,
            commission_table: &config.commission_table,
        }
    }
}

/// Projects a lead's day onto a follower's activities.
///
/// With no lead (no link, or the lead is not selected) both allowances are
/// switched off and every commission projection is reset to zero and
/// unselected. Projected activities are re-priced before returning.
///
/// # Arguments
///
/// * `lead` - The selected lead, if any
/// * `follower_activities` - The follower's freshly rebuilt activities
/// * `inputs` - The follower's doubling flag and bag counts
/// * `rules` - Pay codes the cascade writes to
/// * `ctx` - The follower's pricing inputs
#[must_use]
pub fn propagate_follower_from_lead(
    lead: Option<LeadView<'_>>,
    mut follower_activities: Vec<Activity>,
    inputs: &FollowerInputs,
    rules: &CascadeRules<'_>,
    ctx: &PricingContext<'_>,
) -> Vec<Activity> {
    let location: Option<LocationType> =
        lead.and_then(|view| view.resolved_location(rules.role_codes));
    toggle_location_allowances(&mut follower_activities, location, rules.role_codes);

    for pay_code_id in rules.commission_table.mapped_pay_codes() {
        project(&mut follower_activities, pay_code_id, 0.0);
    }
    for slot in [BagSlot::First, BagSlot::Second] {
        project(&mut follower_activities, rules.role_codes.bag_commission(slot), 0.0);
    }

    let Some(view) = lead else {
        return reprice(follower_activities, ctx);
    };

    let multiplier: f64 = if inputs.doubling { 2.0 } else { 1.0 };
    for (pay_code_id, quantity) in product_quantities(view.sales, rules.commission_table) {
        project(&mut follower_activities, &pay_code_id, quantity * multiplier);
    }

    for slot in [BagSlot::First, BagSlot::Second] {
        let quantity: f64 = inputs.bag_counts.get(slot).quantity(inputs.doubling);
        project(
            &mut follower_activities,
            rules.role_codes.bag_commission(slot),
            quantity,
        );
    }

    reprice(follower_activities, ctx)
}

/// The lead's sales summed per mapped commission pay code.
fn product_quantities(
    sales: &[ProductSale],
    commission_table: &CommissionTable,
) -> BTreeMap<PayCodeId, f64> {
    let mut totals: BTreeMap<PayCodeId, f64> = BTreeMap::new();
    for sale in sales {
        match commission_table.pay_code_for(&sale.product_id) {
            Some(pay_code_id) if sale.quantity.is_finite() => {
                *totals.entry(pay_code_id.clone()).or_insert(0.0) += sale.quantity;
            }
            Some(_) => debug!(product = %sale.product_id, "Ignoring non-finite sale quantity"),
            None => debug!(product = %sale.product_id, "Product has no commission mapping"),
        }
    }
    totals
}

/// Sets a projected quantity; the activity is selected when it is positive.
fn project(activities: &mut [Activity], pay_code_id: &PayCodeId, quantity: f64) {
    if let Some(activity) = find_activity_mut(activities, pay_code_id) {
        activity.units_produced = Some(quantity);
        activity.select(quantity > 0.0, SelectionBasis::Cascade);
    }
}

fn reprice(mut activities: Vec<Activity>, ctx: &PricingContext<'_>) -> Vec<Activity> {
    for activity in &mut activities {
        activity.calculated_amount = price_activity(activity, ctx);
    }
    activities
}
