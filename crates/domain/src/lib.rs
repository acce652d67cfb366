// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod activity;
mod catalog;
mod count;
mod error;
mod leave;
pub mod money;
mod overtime;
mod pay_code;
mod pricing;
mod rate;
mod types;

#[cfg(test)]
mod tests;

pub use activity::{
    Activity, SavedActivitySnapshot, find_activity, find_activity_mut, total_amount,
};
pub use catalog::{CatalogOptions, EffectiveCatalog, merge_catalog};
pub use count::DoubledCount;
pub use error::DomainError;
pub use leave::{
    LeaveAvailability, LeaveBalance, LeaveBalances, LeaveChoice, LeaveType,
    available_leave_types, choose_leave_type, resolve_leave_eligibility, validate_leave_type,
};
pub use money::Money;
pub use overtime::{
    DEFAULT_OVERTIME_THRESHOLD, SATURDAY_OVERTIME_THRESHOLD, default_full_day_hours,
    natural_overtime_hours, overtime_threshold, total_overtime_hours,
};
pub use pay_code::{DayTypeRates, PayCode, RateOverrides};
pub use pricing::{ContextData, PricingContext, price_activity};
pub use rate::resolve_rate;
pub use types::{
    ActivitySource, CatalogSource, DayType, EmployeeId, EntryMode, JobId, LocationType, PayCodeId,
    PayType, RateUnit, SelectionBasis, WorkEntryKey, WorkerRole,
};
