// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{LOG_DATE, create_test_config, create_test_reference};
use crate::{
    Batch, BatchOutcome, Collaborators, Command, EngineConfig, EngineError, EntryFailure,
    EntryInputs, InMemoryReference, ReferenceCache, ReferenceError, RoleLink, WorkEntry,
    apply_and_recalculate, recalculate,
};
use paylog_domain::{
    Activity, DayType, EmployeeId, EntryMode, Money, PayCodeId, SavedActivitySnapshot,
    WorkEntryKey, WorkerRole,
};
use time::Duration;

fn standard(hours: f64) -> WorkEntry {
    WorkEntry::new(WorkerRole::Standard, EntryInputs::with_hours(hours))
}

fn run(batch: &Batch) -> BatchOutcome {
    let reference: InMemoryReference = create_test_reference();
    let config: EngineConfig = create_test_config();
    recalculate(batch, &Collaborators::from_single(&reference), &config)
}

#[test]
fn test_unselected_entries_have_no_activities() {
    let mut idle: WorkEntry = standard(8.0);
    idle.selected = false;
    let batch: Batch = Batch::new(LOG_DATE, DayType::Biasa, EntryMode::Create)
        .with_entry("E1", "MEE", standard(8.0))
        .with_entry("E2", "MEE", idle);

    let outcome: BatchOutcome = run(&batch);
    assert!(outcome.is_clean());
    assert!(
        !outcome
            .batch
            .entry(&WorkEntryKey::new("E1", "MEE"))
            .unwrap()
            .activities
            .is_empty()
    );
    assert!(
        outcome
            .batch
            .entry(&WorkEntryKey::new("E2", "MEE"))
            .unwrap()
            .activities
            .is_empty()
    );
}

#[test]
fn test_entry_failure_does_not_stop_batch() {
    let batch: Batch = Batch::new(LOG_DATE, DayType::Biasa, EntryMode::Create)
        .with_entry("E1", "NOPE", standard(8.0))
        .with_entry("E2", "MEE", standard(8.0));

    let outcome: BatchOutcome = run(&batch);
    assert_eq!(
        outcome.failures,
        vec![EntryFailure {
            key: WorkEntryKey::new("E1", "NOPE"),
            error: EngineError::Reference(ReferenceError::NotFound(String::from("job 'NOPE'"))),
        }]
    );
    // GAJI 8 × 7.50 + MAKAN 5.00
    assert_eq!(
        outcome.batch.entry_total(&WorkEntryKey::new("E2", "MEE")),
        Money::from_cents(6500)
    );
}

#[test]
fn test_link_cycle_fails_both_entries() {
    // Links loaded from a document bypass the checks in `apply`.
    let batch: Batch = Batch::new(LOG_DATE, DayType::Biasa, EntryMode::Create)
        .with_entry("A", "MEE", standard(8.0))
        .with_entry("B", "MEE", standard(8.0))
        .with_entry("C", "MEE", standard(8.0))
        .with_link("A", RoleLink::to("B"))
        .with_link("B", RoleLink::to("A"));

    let outcome: BatchOutcome = run(&batch);
    let failed: Vec<&WorkEntryKey> = outcome.failures.iter().map(|f| &f.key).collect();
    assert_eq!(
        failed,
        vec![&WorkEntryKey::new("A", "MEE"), &WorkEntryKey::new("B", "MEE")]
    );
    assert!(
        outcome
            .failures
            .iter()
            .all(|f| matches!(f.error, EngineError::RoleCycle(_)))
    );
    assert_eq!(
        outcome.batch.total_pay(),
        outcome.batch.entry_total(&WorkEntryKey::new("C", "MEE"))
    );
}

#[test]
fn test_total_pay_sums_selected_entries() {
    let batch: Batch = Batch::new(LOG_DATE, DayType::Biasa, EntryMode::Create)
        .with_entry("E1", "MEE", standard(8.0))
        .with_entry("E2", "MEE", standard(4.0));

    let outcome: BatchOutcome = run(&batch);
    // (60.00 + 5.00) + (30.00 + 5.00)
    assert_eq!(outcome.batch.total_pay(), Money::from_cents(10000));
}

#[test]
fn test_unsaved_changes_tracks_edits() {
    let created: BatchOutcome = run(
        &Batch::new(LOG_DATE, DayType::Biasa, EntryMode::Create).with_entry(
            "E1",
            "MEE",
            standard(8.0),
        ),
    );
    let key: WorkEntryKey = WorkEntryKey::new("E1", "MEE");
    let saved: Vec<Activity> = created
        .batch
        .entry(&key)
        .unwrap()
        .activities
        .iter()
        .filter(|a| a.is_selected)
        .cloned()
        .collect();

    let mut editing: Batch = created.batch.clone();
    editing.mode = EntryMode::Edit;
    let editing: Batch = editing.with_saved("E1", "MEE", SavedActivitySnapshot::new(saved));

    let reloaded: BatchOutcome = run(&editing);
    assert!(!reloaded.batch.has_unsaved_changes());

    let reference: InMemoryReference = create_test_reference();
    let toggled: BatchOutcome = apply_and_recalculate(
        &reloaded.batch,
        Command::ToggleActivity {
            entry: key,
            pay_code: PayCodeId::new("MAKAN"),
            selected: false,
        },
        &Collaborators::from_single(&reference),
        &create_test_config(),
    )
    .unwrap();
    assert!(toggled.batch.has_unsaved_changes());
}

#[test]
fn test_cached_reference_serves_recalculation() {
    let reference: InMemoryReference = create_test_reference();
    let cache: ReferenceCache<InMemoryReference> =
        ReferenceCache::new(reference.clone(), Duration::minutes(5));
    let collaborators: Collaborators<'_> = Collaborators {
        pay_codes: &cache,
        product_sales: &reference,
    };
    let batch: Batch = Batch::new(LOG_DATE, DayType::Biasa, EntryMode::Create)
        .with_entry("E1", "MEE", standard(8.0))
        .with_entry("E2", "MEE", standard(8.0));

    let outcome: BatchOutcome = recalculate(&batch, &collaborators, &create_test_config());
    assert!(outcome.is_clean());
    // One job entry plus one override entry per employee.
    assert_eq!(cache.len(), 3);
    assert_eq!(outcome.batch.total_pay(), Money::from_cents(13000));
}

#[test]
fn test_rejected_command_leaves_nothing_to_recalculate() {
    let reference: InMemoryReference = create_test_reference();
    let batch: Batch = Batch::new(LOG_DATE, DayType::Biasa, EntryMode::Create)
        .with_entry("E1", "MEE", standard(8.0));

    let result: Result<BatchOutcome, EngineError> = apply_and_recalculate(
        &batch,
        Command::SetLead {
            follower: EmployeeId::new("E1"),
            lead: Some(EmployeeId::new("E1")),
        },
        &Collaborators::from_single(&reference),
        &create_test_config(),
    );
    assert_eq!(result, Err(EngineError::SelfLead(EmployeeId::new("E1"))));
}
