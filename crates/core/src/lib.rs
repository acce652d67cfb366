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

mod apply;
mod cascade;
mod command;
mod config;
mod error;
mod orchestrator;
mod reference;
mod selection;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::apply;
pub use cascade::{
    CascadeRules, FollowerInputs, LeadView, ManualBagCounts, propagate_follower_from_lead,
};
pub use command::Command;
pub use config::{BagSlot, CommissionTable, EngineConfig, RoleCodes, SpecialCodes};
pub use error::{EngineError, ReferenceError};
pub use orchestrator::{BatchOutcome, EntryFailure, apply_and_recalculate, recalculate};
pub use reference::{
    Collaborators, Holiday, HolidayCalendar, InMemoryReference, LeaveBalanceProvider,
    PayCodeProvider, ProductSale, ProductSalesProvider, ReferenceCache,
};
pub use selection::{EntryInputs, EntryRebuild, price_activities, rebuild_activities_for_entry};
pub use state::{Batch, LeaveSelection, RoleLink, WorkEntry};
