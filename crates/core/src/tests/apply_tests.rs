// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    LOG_DATE, create_lead_follower_batch, create_test_config, create_test_reference,
};
use crate::{
    BagSlot, Batch, Collaborators, Command, EngineError, EntryInputs, InMemoryReference,
    LeaveSelection, RoleLink, WorkEntry, apply, recalculate,
};
use paylog_domain::{
    DayType, DomainError, EmployeeId, EntryMode, LeaveBalance, LeaveBalances, LeaveType,
    LocationType, PayCodeId, WorkEntryKey, WorkerRole,
};

fn create_test_batch() -> Batch {
    Batch::new(LOG_DATE, DayType::Biasa, EntryMode::Create)
        .with_entry(
            "E1",
            "MEE",
            WorkEntry::new(WorkerRole::Standard, EntryInputs::with_hours(8.0)),
        )
        .with_entry(
            "E1",
            "BIHUN",
            WorkEntry::new(WorkerRole::Standard, EntryInputs::with_hours(2.0)),
        )
        .with_entry(
            "E2",
            "MEE",
            WorkEntry::new(WorkerRole::Standard, EntryInputs::with_hours(8.0)),
        )
}

fn balances(sick: (u16, u16), annual: (u16, u16)) -> LeaveBalances {
    LeaveBalances {
        sick: LeaveBalance::new(sick.0, sick.1),
        annual: LeaveBalance::new(annual.0, annual.1),
        ..LeaveBalances::new("E1")
    }
}

#[test]
fn test_set_hours_returns_new_batch() {
    let batch: Batch = create_test_batch();
    let key: WorkEntryKey = WorkEntryKey::new("E1", "MEE");

    let next: Batch = apply(
        &batch,
        Command::SetHours {
            entry: key.clone(),
            hours: 10.5,
        },
    )
    .unwrap();

    assert!((next.entry(&key).unwrap().inputs.hours - 10.5).abs() < f64::EPSILON);
    assert!((batch.entry(&key).unwrap().inputs.hours - 8.0).abs() < f64::EPSILON);
}

#[test]
fn test_unknown_entry_is_rejected() {
    let batch: Batch = create_test_batch();
    let result: Result<Batch, EngineError> = apply(
        &batch,
        Command::SetTrayCount {
            entry: WorkEntryKey::new("E9", "MEE"),
            count: 4,
        },
    );
    assert_eq!(
        result,
        Err(EngineError::UnknownEntry(WorkEntryKey::new("E9", "MEE")))
    );
}

#[test]
fn test_leave_falls_back_and_clears_work() {
    let batch: Batch = create_test_batch();
    let e1: EmployeeId = EmployeeId::new("E1");

    let next: Batch = apply(
        &batch,
        Command::SelectLeave {
            employee: e1.clone(),
            balances: balances((14, 14), (8, 3)),
            is_holiday: false,
            leave_type: None,
        },
    )
    .unwrap();

    assert_eq!(
        next.leave.get(&e1),
        Some(&LeaveSelection {
            leave_type: LeaveType::CutiTahunan,
            used_fallback: true,
        })
    );
    assert!(!next.is_working(&e1));
    assert!(next.is_working(&EmployeeId::new("E2")));
    // The input batch is untouched.
    assert!(batch.is_working(&e1));
}

#[test]
fn test_leave_without_balance_is_rejected() {
    let batch: Batch = create_test_batch();
    let result: Result<Batch, EngineError> = apply(
        &batch,
        Command::SelectLeave {
            employee: EmployeeId::new("E1"),
            balances: balances((14, 14), (8, 8)),
            is_holiday: false,
            leave_type: None,
        },
    );

    match result {
        Err(EngineError::DomainViolation(DomainError::NoLeaveBalance { employee, checked })) => {
            assert_eq!(employee, EmployeeId::new("E1"));
            assert_eq!(checked, vec![LeaveType::CutiSakit, LeaveType::CutiTahunan]);
        }
        other => panic!("expected NoLeaveBalance, got {other:?}"),
    }
}

#[test]
fn test_explicit_leave_type_is_validated() {
    let batch: Batch = create_test_batch();
    let result: Result<Batch, EngineError> = apply(
        &batch,
        Command::SelectLeave {
            employee: EmployeeId::new("E1"),
            balances: balances((14, 2), (8, 3)),
            is_holiday: false,
            leave_type: Some(LeaveType::CutiUmum),
        },
    );
    assert!(matches!(
        result,
        Err(EngineError::DomainViolation(
            DomainError::LeaveTypeNotApplicable { .. }
        ))
    ));
}

#[test]
fn test_selecting_work_takes_employee_off_leave() {
    let batch: Batch = create_test_batch();
    let e1: EmployeeId = EmployeeId::new("E1");
    let on_leave: Batch = apply(
        &batch,
        Command::SelectLeave {
            employee: e1.clone(),
            balances: balances((14, 0), (8, 0)),
            is_holiday: false,
            leave_type: None,
        },
    )
    .unwrap();
    assert!(on_leave.is_on_leave(&e1));

    let working: Batch = apply(
        &on_leave,
        Command::SelectEntry {
            entry: WorkEntryKey::new("E1", "MEE"),
            selected: true,
        },
    )
    .unwrap();
    assert!(!working.is_on_leave(&e1));
    assert!(working.is_working(&e1));
}

#[test]
fn test_lead_links_are_validated() {
    let batch: Batch = create_lead_follower_batch(LocationType::Local, false);

    assert_eq!(
        apply(
            &batch,
            Command::SetLead {
                follower: EmployeeId::new("F1"),
                lead: Some(EmployeeId::new("F1")),
            },
        ),
        Err(EngineError::SelfLead(EmployeeId::new("F1")))
    );
    assert_eq!(
        apply(
            &batch,
            Command::SetLead {
                follower: EmployeeId::new("F1"),
                lead: Some(EmployeeId::new("NOBODY")),
            },
        ),
        Err(EngineError::UnknownEmployee(EmployeeId::new("NOBODY")))
    );
    // F1 → F2 would close the loop F2 → F1.
    let chained: Batch = batch
        .with_entry(
            "F2",
            "LORI",
            WorkEntry::new(WorkerRole::Follower, EntryInputs::with_hours(8.0)),
        )
        .with_link("F2", RoleLink::to("F1"));
    assert_eq!(
        apply(
            &chained,
            Command::SetLead {
                follower: EmployeeId::new("F1"),
                lead: Some(EmployeeId::new("F2")),
            },
        ),
        Err(EngineError::RoleCycle(EmployeeId::new("F1")))
    );
}

#[test]
fn test_only_followers_take_a_lead() {
    let batch: Batch = create_lead_follower_batch(LocationType::Local, false);
    let s1: EmployeeId = EmployeeId::new("S1");

    assert_eq!(
        apply(
            &batch,
            Command::SetLead {
                follower: s1.clone(),
                lead: Some(EmployeeId::new("F1")),
            },
        ),
        Err(EngineError::NotAFollower(s1.clone()))
    );

    // A stray link on a salesman does not make them a follower.
    let stray: Batch = batch.with_link("S1", RoleLink::to("F1"));
    assert_eq!(
        apply(
            &stray,
            Command::SetDoubling {
                follower: s1.clone(),
                doubling: true,
            },
        ),
        Err(EngineError::NotAFollower(s1.clone()))
    );
    assert_eq!(
        apply(
            &stray,
            Command::SetBagCount {
                follower: s1.clone(),
                slot: BagSlot::First,
                displayed: 10.0,
            },
        ),
        Err(EngineError::NotAFollower(s1))
    );
}

#[test]
fn test_follower_settings_need_a_link() {
    let batch: Batch = create_test_batch();
    assert_eq!(
        apply(
            &batch,
            Command::SetDoubling {
                follower: EmployeeId::new("E1"),
                doubling: true,
            },
        ),
        Err(EngineError::NotAFollower(EmployeeId::new("E1")))
    );
}

#[test]
fn test_negative_bag_count_is_rejected() {
    let batch: Batch = create_lead_follower_batch(LocationType::Local, true);
    let result: Result<Batch, EngineError> = apply(
        &batch,
        Command::SetBagCount {
            follower: EmployeeId::new("F1"),
            slot: BagSlot::Second,
            displayed: -4.0,
        },
    );
    assert!(matches!(
        result,
        Err(EngineError::DomainViolation(DomainError::InvalidCount { .. }))
    ));
}

#[test]
fn test_toggle_requires_known_pay_code() {
    let reference: InMemoryReference = create_test_reference();
    let built: Batch = recalculate(
        &create_test_batch(),
        &Collaborators::from_single(&reference),
        &create_test_config(),
    )
    .batch;
    let key: WorkEntryKey = WorkEntryKey::new("E2", "MEE");

    let toggled: Batch = apply(
        &built,
        Command::ToggleActivity {
            entry: key.clone(),
            pay_code: PayCodeId::new("MAKAN"),
            selected: true,
        },
    )
    .unwrap();
    assert_eq!(
        toggled
            .entry(&key)
            .unwrap()
            .inputs
            .selection_overrides
            .get(&PayCodeId::new("MAKAN")),
        Some(&true)
    );

    assert_eq!(
        apply(
            &built,
            Command::ToggleActivity {
                entry: key.clone(),
                pay_code: PayCodeId::new("NOPE"),
                selected: true,
            },
        ),
        Err(EngineError::UnknownPayCode {
            entry: key,
            pay_code: PayCodeId::new("NOPE"),
        })
    );
}

#[test]
fn test_context_field_set_and_removed() {
    let batch: Batch = create_test_batch();
    let set: Batch = apply(
        &batch,
        Command::SetContextField {
            field: String::from("boxes"),
            value: Some(12.0),
        },
    )
    .unwrap();
    assert_eq!(set.context.get("boxes"), Some(12.0));

    let removed: Batch = apply(
        &set,
        Command::SetContextField {
            field: String::from("boxes"),
            value: None,
        },
    )
    .unwrap();
    assert_eq!(removed.context.get("boxes"), None);
}

#[test]
fn test_commands_round_trip_through_json() {
    let command: Command = Command::SetBagCount {
        follower: EmployeeId::new("F1"),
        slot: BagSlot::First,
        displayed: 20.0,
    };
    let json: String = serde_json::to_string(&command).unwrap();
    assert!(json.contains(r#""command":"set_bag_count""#));
    assert_eq!(serde_json::from_str::<Command>(&json).unwrap(), command);
}
