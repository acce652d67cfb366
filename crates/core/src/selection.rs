// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Selection reconciliation.
//!
//! A rebuild turns an effective catalog and an entry's inputs into a fresh,
//! priced activity list:
//!
//! 1. One activity per catalog pay code, rated for the day type.
//! 2. Candidate selection: a saved snapshot is replayed in edit mode,
//!    otherwise the default rules apply. Named exceptions and the caller's
//!    manual toggles are layered on top.
//! 3. Quantities are resolved from context fields or caller input.
//! 4. Every activity is priced.
//! 5. Zero-valued activities nobody chose explicitly are switched off.
//!
//! Steps 3 to 5 are [`price_activities`], which the cascade also reuses.

use crate::config::{RoleCodes, SpecialCodes};
use paylog_domain::{
    Activity, ActivitySource, ContextData, DayType, EffectiveCatalog, EntryMode, LocationType,
    PayCode, PayCodeId, PayType, PricingContext, RateUnit, SavedActivitySnapshot, SelectionBasis,
    find_activity_mut, price_activity, resolve_rate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;
use tracing::debug;

/// Everything a caller can change on one work entry.
///
/// Activities are never edited directly; these inputs are, and the activity
/// list is regenerated from them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryInputs {
    /// Hours worked.
    pub hours: f64,
    /// Manually attested overtime added to natural overtime.
    pub forced_overtime_hours: f64,
    /// Overtime hours for monthly entries, applied directly to overtime
    /// activities instead of the threshold rule.
    pub overtime_hours: Option<f64>,
    /// Manually entered quantities per pay code.
    pub units: BTreeMap<PayCodeId, f64>,
    /// Manual selection toggles per pay code.
    pub selection_overrides: BTreeMap<PayCodeId, bool>,
    /// Externally tracked tray count.
    pub tray_count: u32,
    /// Whether the cleaning-mode substitute pay code applies.
    pub cleaning_mode: bool,
    /// The route location, for salesman entries.
    pub location: Option<LocationType>,
}

impl EntryInputs {
    /// Inputs with the given hours worked.
    #[must_use]
    pub fn with_hours(hours: f64) -> Self {
        Self {
            hours,
            ..Self::default()
        }
    }

    /// The pricing context these inputs describe.
    #[must_use]
    pub const fn pricing_context<'a>(
        &self,
        log_date: Option<Date>,
        context: &'a ContextData,
    ) -> PricingContext<'a> {
        PricingContext::new(self.hours, context)
            .on(log_date)
            .with_forced_overtime(self.forced_overtime_hours)
            .at(self.location)
    }
}

/// A request to rebuild one work entry's activities.
#[derive(Debug, Clone, Copy)]
pub struct EntryRebuild<'a> {
    /// The merged catalog for the entry.
    pub catalog: &'a EffectiveCatalog,
    /// The snapshot captured when the log was loaded, if the entry existed.
    pub snapshot: Option<&'a SavedActivitySnapshot>,
    /// Create or edit.
    pub mode: EntryMode,
    /// Decides which rate column applies.
    pub day_type: DayType,
    /// The log date; decides the overtime threshold.
    pub log_date: Option<Date>,
    /// External context fields.
    pub context: &'a ContextData,
    /// The entry's inputs.
    pub inputs: &'a EntryInputs,
    /// Named pay codes with hard-coded selection rules.
    pub special_codes: &'a SpecialCodes,
    /// Allowance pay codes toggled by the entry's location.
    pub role_codes: &'a RoleCodes,
}

impl EntryRebuild<'_> {
    /// The snapshot to replay, if any. Create mode never replays.
    fn replay(&self) -> Option<&SavedActivitySnapshot> {
        match self.mode {
            EntryMode::Edit => self.snapshot,
            EntryMode::Create => None,
        }
    }

    fn pricing_context(&self) -> PricingContext<'_> {
        self.inputs.pricing_context(self.log_date, self.context)
    }
}

/// Rebuilds the priced activity list for one work entry.
///
/// The output depends only on the request, so rebuilding twice with the same
/// inputs yields identical activities. The snapshot is only read.
#[must_use]
pub fn rebuild_activities_for_entry(request: &EntryRebuild<'_>) -> Vec<Activity> {
    let ctx: PricingContext<'_> = request.pricing_context();
    let overtime_hours: f64 = request
        .inputs
        .overtime_hours
        .unwrap_or_else(|| ctx.overtime_hours());

    let mut activities: Vec<Activity> = request
        .catalog
        .iter()
        .map(|pay_code| candidate(request, pay_code, overtime_hours))
        .collect();

    if request.inputs.cleaning_mode {
        force_cleaning_code(request, &mut activities);
    }

    for (pay_code_id, selected) in &request.inputs.selection_overrides {
        match find_activity_mut(&mut activities, pay_code_id) {
            Some(activity) => activity.select(*selected, SelectionBasis::Manual),
            None => debug!(
                pay_code = %pay_code_id,
                "Ignoring toggle for pay code not in catalog"
            ),
        }
    }

    price_activities(activities, &ctx, request.role_codes)
}

/// Builds one activity with its candidate selection and seeded inputs.
fn candidate(request: &EntryRebuild<'_>, pay_code: &PayCode, overtime_hours: f64) -> Activity {
    let mut activity: Activity =
        Activity::from_pay_code(pay_code, resolve_rate(pay_code, request.day_type));
    let special: &SpecialCodes = request.special_codes;

    match request.replay() {
        Some(snapshot) => {
            let saved: bool = snapshot.get(&pay_code.id).is_some_and(|a| a.is_selected);
            activity.select(saved, SelectionBasis::Saved);
        }
        None => {
            if pay_code.id == special.tray && request.inputs.tray_count > 0 {
                activity.select(true, SelectionBasis::Forced);
            } else {
                activity.select(
                    default_selection(pay_code, overtime_hours),
                    SelectionBasis::Default,
                );
            }
        }
    }

    activity.units_produced = request
        .inputs
        .units
        .get(&pay_code.id)
        .copied()
        .or_else(|| {
            request
                .replay()
                .and_then(|snapshot| snapshot.get(&pay_code.id))
                .and_then(|saved| saved.units_produced)
        });
    if activity.units_produced.is_none()
        && pay_code.id == special.tray
        && pay_code.rate_unit.is_quantity_entry()
    {
        activity.units_produced = Some(f64::from(request.inputs.tray_count));
    }

    if pay_code.pay_type == PayType::Overtime && pay_code.rate_unit == RateUnit::Hour {
        activity.hours_applied = request.inputs.overtime_hours;
    }

    activity
}

/// The create-mode default for a pay code.
fn default_selection(pay_code: &PayCode, overtime_hours: f64) -> bool {
    if pay_code.is_context_linked() || pay_code.rate_unit.is_quantity_entry() {
        return false;
    }
    match pay_code.pay_type {
        PayType::Tambahan => false,
        PayType::Overtime => overtime_hours > 0.0 && pay_code.default_selected,
        PayType::Base => pay_code.default_selected,
    }
}

fn force_cleaning_code(request: &EntryRebuild<'_>, activities: &mut Vec<Activity>) {
    let special: &SpecialCodes = request.special_codes;

    if find_activity_mut(activities, &special.cleaning).is_none() {
        match &special.cleaning_pay_code {
            Some(pay_code) => activities.push(Activity::from_pay_code(
                pay_code,
                resolve_rate(pay_code, request.day_type),
            )),
            None => {
                debug!(
                    pay_code = %special.cleaning,
                    "Cleaning mode active but cleaning pay code not in catalog"
                );
                return;
            }
        }
    }

    if let Some(activity) = find_activity_mut(activities, &special.cleaning) {
        activity.source = ActivitySource::CleaningMode;
        activity.select(true, SelectionBasis::Forced);
    }
}

/// Resolves quantities, prices, and auto-deselects an activity list.
///
/// When the context carries a location, the matching allowance is selected
/// and the other switched off before pricing.
///
/// # Arguments
///
/// * `activities` - The activities to price
/// * `ctx` - The entry's pricing inputs
/// * `role_codes` - The allowance pay codes a location toggles
#[must_use]
pub fn price_activities(
    mut activities: Vec<Activity>,
    ctx: &PricingContext<'_>,
    role_codes: &RoleCodes,
) -> Vec<Activity> {
    if let Some(location) = ctx.location {
        toggle_location_allowances(&mut activities, Some(location), role_codes);
    }

    for activity in &mut activities {
        resolve_units(activity, ctx.context);
        activity.calculated_amount = price_activity(activity, ctx);

        if activity.is_selected
            && activity.calculated_amount.is_zero()
            && !activity.is_context_linked
            && !activity.selection_basis.is_explicit()
            && !activity.rate_unit.is_quantity_entry()
        {
            activity.select(false, SelectionBasis::Default);
        }
    }

    activities
}

/// Selects the allowance matching a location and clears the other. With no
/// location both are cleared.
pub(crate) fn toggle_location_allowances(
    activities: &mut [Activity],
    location: Option<LocationType>,
    role_codes: &RoleCodes,
) {
    for each in [LocationType::Local, LocationType::Outstation] {
        let on: bool = location == Some(each);
        if let Some(activity) = find_activity_mut(activities, role_codes.allowance_for(each)) {
            activity.select(on, SelectionBasis::Cascade);
        }
    }
}

fn resolve_units(activity: &mut Activity, context: &ContextData) {
    if activity.is_context_linked {
        activity.units_produced = activity
            .context_field
            .as_deref()
            .and_then(|field| context.get(field));
    } else if activity.units_produced.is_none() && activity.requires_units_input {
        activity.units_produced = Some(0.0);
    }
}
