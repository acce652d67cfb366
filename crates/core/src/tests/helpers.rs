// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Batch, CommissionTable, EngineConfig, EntryInputs, EntryRebuild, InMemoryReference,
    ProductSale, RoleCodes, RoleLink, SpecialCodes, WorkEntry, rebuild_activities_for_entry,
};
use paylog_domain::{
    Activity, CatalogOptions, ContextData, DayType, EffectiveCatalog, EmployeeId, EntryMode,
    JobId, LocationType, PayCode, PayCodeId, PayType, RateUnit, SavedActivitySnapshot,
    WorkerRole, find_activity, merge_catalog,
};
use time::Date;
use time::macros::date;

/// A Monday.
pub const LOG_DATE: Date = date!(2026 - 08 - 31);
/// A Saturday.
pub const SATURDAY: Date = date!(2026 - 08 - 29);

pub fn create_test_job_codes() -> Vec<PayCode> {
    vec![
        PayCode::new("GAJI", PayType::Base, RateUnit::Hour, 7.5).selected_by_default(),
        PayCode::new("OT", PayType::Overtime, RateUnit::Hour, 5.0).selected_by_default(),
        PayCode::new("TRIP", PayType::Base, RateUnit::Trip, 12.0).requiring_units(),
        PayCode::new("MAKAN", PayType::Tambahan, RateUnit::Fixed, 5.0).selected_by_default(),
        PayCode::new("KOTAK", PayType::Base, RateUnit::Bag, 0.5).linked_to("boxes"),
        PayCode::new("DULANG", PayType::Base, RateUnit::Fixed, 10.0),
    ]
}

pub fn create_test_catalog() -> EffectiveCatalog {
    merge_catalog(&create_test_job_codes(), &[], CatalogOptions::default())
}

pub fn create_salesman_codes() -> Vec<PayCode> {
    vec![
        PayCode::new("ELAUN_MT", PayType::Tambahan, RateUnit::Fixed, 10.0),
        PayCode::new("ELAUN_MO", PayType::Tambahan, RateUnit::Fixed, 20.0),
        PayCode::new("KOMISEN", PayType::Tambahan, RateUnit::Percent, 2.0).requiring_units(),
    ]
}

pub fn create_follower_codes() -> Vec<PayCode> {
    vec![
        PayCode::new("ELAUN_MT", PayType::Tambahan, RateUnit::Fixed, 10.0),
        PayCode::new("ELAUN_MO", PayType::Tambahan, RateUnit::Fixed, 20.0),
        PayCode::new("DME-X", PayType::Tambahan, RateUnit::Bag, 0.5),
        PayCode::new("DME-Y", PayType::Tambahan, RateUnit::Bag, 0.25),
        PayCode::new("BAG_COMM_1", PayType::Tambahan, RateUnit::Bag, 0.1),
        PayCode::new("BAG_COMM_2", PayType::Tambahan, RateUnit::Bag, 0.2),
    ]
}

pub fn create_test_reference() -> InMemoryReference {
    let mut reference: InMemoryReference = InMemoryReference::default();
    reference
        .jobs
        .insert(JobId::new("MEE"), create_test_job_codes());
    reference
        .jobs
        .insert(JobId::new("JUAL"), create_salesman_codes());
    reference
        .jobs
        .insert(JobId::new("LORI"), create_follower_codes());
    reference.product_sales.insert(
        EmployeeId::new("S1"),
        vec![
            ProductSale {
                product_id: String::from("X"),
                quantity: 10.0,
                date: LOG_DATE,
            },
            ProductSale {
                product_id: String::from("Y"),
                quantity: 4.0,
                date: date!(2026 - 08 - 30),
            },
        ],
    );
    reference
}

pub fn create_test_config() -> EngineConfig {
    EngineConfig {
        commission_table: CommissionTable::new([("X", "DME-X"), ("Y", "DME-Y")]),
        ..EngineConfig::default()
    }
}

/// A lead salesman `S1` on `JUAL` and a follower `F1` on `LORI`.
pub fn create_lead_follower_batch(location: LocationType, doubling: bool) -> Batch {
    let lead_inputs: EntryInputs = EntryInputs {
        location: Some(location),
        ..EntryInputs::with_hours(8.0)
    };
    let mut link: RoleLink = RoleLink::to("S1");
    link.doubling = doubling;

    Batch::new(LOG_DATE, DayType::Biasa, EntryMode::Create)
        .with_entry("S1", "JUAL", WorkEntry::new(WorkerRole::Salesman, lead_inputs))
        .with_entry(
            "F1",
            "LORI",
            WorkEntry::new(WorkerRole::Follower, EntryInputs::with_hours(8.0)),
        )
        .with_link("F1", link)
}

/// Rebuilds against the test catalog with default configuration.
pub fn rebuild(
    mode: EntryMode,
    snapshot: Option<&SavedActivitySnapshot>,
    log_date: Date,
    inputs: &EntryInputs,
) -> Vec<Activity> {
    rebuild_with(&create_test_catalog(), mode, snapshot, log_date, inputs)
}

pub fn rebuild_with(
    catalog: &EffectiveCatalog,
    mode: EntryMode,
    snapshot: Option<&SavedActivitySnapshot>,
    log_date: Date,
    inputs: &EntryInputs,
) -> Vec<Activity> {
    let context: ContextData = ContextData::new();
    let special: SpecialCodes = SpecialCodes::default();
    let roles: RoleCodes = RoleCodes::default();
    rebuild_activities_for_entry(&EntryRebuild {
        catalog,
        snapshot,
        mode,
        day_type: DayType::Biasa,
        log_date: Some(log_date),
        context: &context,
        inputs,
        special_codes: &special,
        role_codes: &roles,
    })
}

pub fn activity<'a>(activities: &'a [Activity], id: &str) -> &'a Activity {
    find_activity(activities, &PayCodeId::new(id)).expect("activity present")
}
