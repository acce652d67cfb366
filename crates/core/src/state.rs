// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::cascade::{FollowerInputs, ManualBagCounts};
use crate::selection::EntryInputs;
use paylog_domain::{
    Activity, ContextData, DayType, EmployeeId, EntryMode, LeaveChoice, LeaveType, Money,
    PayCodeId, SavedActivitySnapshot, WorkEntryKey, WorkerRole, default_full_day_hours, money,
    total_amount,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use time::Date;

/// One row of work: an employee on a job for the log date.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkEntry {
    /// The employee's role on this job.
    #[serde(default)]
    pub role: WorkerRole,
    /// Whether the employee is working this job today.
    #[serde(default)]
    pub selected: bool,
    /// Caller-editable inputs.
    #[serde(default)]
    pub inputs: EntryInputs,
    /// Derived activities. Replaced on every recalculation.
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl WorkEntry {
    /// Creates a selected entry with the given role and inputs.
    #[must_use]
    pub fn new(role: WorkerRole, inputs: EntryInputs) -> Self {
        Self {
            role,
            selected: true,
            inputs,
            activities: Vec::new(),
        }
    }

    /// Total of the selected activities, or zero when the entry is not selected.
    #[must_use]
    pub fn total(&self) -> Money {
        if self.selected {
            total_amount(&self.activities)
        } else {
            Money::ZERO
        }
    }
}

/// A follower's link to the lead they ride with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleLink {
    /// The lead salesman.
    pub lead: EmployeeId,
    /// Doubles every projected quantity.
    #[serde(default)]
    pub doubling: bool,
    /// Manually entered bag counts, stored as base counts.
    #[serde(default)]
    pub bag_counts: ManualBagCounts,
}

impl RoleLink {
    /// Links a follower to a lead with no doubling and no bag counts.
    #[must_use]
    pub fn new(lead: EmployeeId) -> Self {
        Self {
            lead,
            doubling: false,
            bag_counts: ManualBagCounts::default(),
        }
    }

    /// Shorthand for [`RoleLink::new`].
    #[must_use]
    pub fn to(lead: &str) -> Self {
        Self::new(EmployeeId::new(lead))
    }

    /// The cascade settings this link describes.
    #[must_use]
    pub const fn follower_inputs(&self) -> FollowerInputs {
        FollowerInputs {
            doubling: self.doubling,
            bag_counts: self.bag_counts,
        }
    }
}

/// An employee placed on leave for the log date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveSelection {
    /// The category taken.
    pub leave_type: LeaveType,
    /// Whether the date's default category had to be skipped.
    #[serde(default)]
    pub used_fallback: bool,
}

impl From<LeaveChoice> for LeaveSelection {
    fn from(choice: LeaveChoice) -> Self {
        Self {
            leave_type: choice.leave_type,
            used_fallback: choice.used_fallback,
        }
    }
}

/// A day's work log: every entry, leave selection and role link for one date.
///
/// Employees are either working or on leave, never both. Every mutation that
/// touches one side clears the other in the same step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// The log date.
    pub log_date: Date,
    /// Decides which rate column applies.
    #[serde(default)]
    pub day_type: DayType,
    /// Create or edit.
    #[serde(default)]
    pub mode: EntryMode,
    /// External context fields shared by every entry.
    #[serde(default)]
    pub context: ContextData,
    /// Work entries by `(employee, job)`.
    #[serde(default, with = "entry_map")]
    pub entries: BTreeMap<WorkEntryKey, WorkEntry>,
    /// Employees on leave.
    #[serde(default)]
    pub leave: BTreeMap<EmployeeId, LeaveSelection>,
    /// Follower → lead links.
    #[serde(default)]
    pub role_links: BTreeMap<EmployeeId, RoleLink>,
    /// Snapshots captured when the log was loaded for editing.
    #[serde(default, with = "entry_map")]
    pub saved: BTreeMap<WorkEntryKey, SavedActivitySnapshot>,
}

impl Batch {
    /// Creates an empty batch.
    ///
    /// # Arguments
    ///
    /// * `log_date` - The date being logged
    /// * `day_type` - The day type for that date
    /// * `mode` - Whether this is a new log or an edit of a saved one
    #[must_use]
    pub const fn new(log_date: Date, day_type: DayType, mode: EntryMode) -> Self {
        Self {
            log_date,
            day_type,
            mode,
            context: ContextData::new(),
            entries: BTreeMap::new(),
            leave: BTreeMap::new(),
            role_links: BTreeMap::new(),
            saved: BTreeMap::new(),
        }
    }

    /// Adds or replaces a work entry.
    pub fn insert_entry(&mut self, key: WorkEntryKey, entry: WorkEntry) {
        self.entries.insert(key, entry);
    }

    /// Builder form of [`Batch::insert_entry`].
    #[must_use]
    pub fn with_entry(mut self, employee: &str, job: &str, entry: WorkEntry) -> Self {
        self.insert_entry(WorkEntryKey::new(employee, job), entry);
        self
    }

    /// Links a follower to a lead.
    #[must_use]
    pub fn with_link(mut self, follower: &str, link: RoleLink) -> Self {
        self.role_links.insert(EmployeeId::new(follower), link);
        self
    }

    /// Records the saved snapshot for an entry.
    #[must_use]
    pub fn with_saved(
        mut self,
        employee: &str,
        job: &str,
        snapshot: SavedActivitySnapshot,
    ) -> Self {
        self.saved.insert(WorkEntryKey::new(employee, job), snapshot);
        self
    }

    /// Looks up a work entry.
    #[must_use]
    pub fn entry(&self, key: &WorkEntryKey) -> Option<&WorkEntry> {
        self.entries.get(key)
    }

    /// Every entry belonging to an employee, in job order.
    pub fn entries_for<'a>(
        &'a self,
        employee: &'a EmployeeId,
    ) -> impl Iterator<Item = (&'a WorkEntryKey, &'a WorkEntry)> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| &key.employee == employee)
    }

    /// Whether an employee has any entry in the batch.
    #[must_use]
    pub fn has_employee(&self, employee: &EmployeeId) -> bool {
        self.entries_for(employee).next().is_some()
    }

    /// Whether an employee works any job in the follower role.
    #[must_use]
    pub fn is_follower(&self, employee: &EmployeeId) -> bool {
        self.entries_for(employee)
            .any(|(_, entry)| entry.role == WorkerRole::Follower)
    }

    /// Every employee with an entry, ordered.
    #[must_use]
    pub fn employees(&self) -> BTreeSet<EmployeeId> {
        self.entries.keys().map(|key| key.employee.clone()).collect()
    }

    /// Whether an employee is working any job.
    #[must_use]
    pub fn is_working(&self, employee: &EmployeeId) -> bool {
        self.entries_for(employee).any(|(_, entry)| entry.selected)
    }

    /// Whether an employee is on leave.
    #[must_use]
    pub fn is_on_leave(&self, employee: &EmployeeId) -> bool {
        self.leave.contains_key(employee)
    }

    /// Places an employee on leave and clears every work selection they have.
    pub fn select_leave(&mut self, employee: &EmployeeId, selection: LeaveSelection) {
        for (key, entry) in &mut self.entries {
            if &key.employee == employee {
                entry.selected = false;
                entry.activities.clear();
            }
        }
        self.leave.insert(employee.clone(), selection);
    }

    /// Takes an employee off leave. Work selections are not restored.
    pub fn clear_leave(&mut self, employee: &EmployeeId) {
        self.leave.remove(employee);
    }

    /// Selects or deselects a work entry. Selecting clears the employee's leave.
    pub(crate) fn set_entry_selected(&mut self, key: &WorkEntryKey, selected: bool) -> bool {
        let Some(entry) = self.entries.get_mut(key) else {
            return false;
        };
        entry.selected = selected;
        if selected {
            // An entry selected with no hours starts from a full day.
            if entry.inputs.hours <= 0.0 {
                entry.inputs.hours = default_full_day_hours(self.log_date);
            }
            self.leave.remove(&key.employee);
        } else {
            entry.activities.clear();
        }
        true
    }

    /// The amount payable on one entry.
    #[must_use]
    pub fn entry_total(&self, key: &WorkEntryKey) -> Money {
        self.entries.get(key).map_or(Money::ZERO, WorkEntry::total)
    }

    /// The amount payable across the whole batch.
    #[must_use]
    pub fn total_pay(&self) -> Money {
        money::sum(self.entries.values().map(WorkEntry::total))
    }

    /// Whether the selected activities differ from what was saved.
    ///
    /// Compares pay code, quantity, hours and amount of the selected
    /// activities on each entry; selection provenance and descriptions are
    /// not part of the comparison.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        let keys: BTreeSet<&WorkEntryKey> = self.entries.keys().chain(self.saved.keys()).collect();

        keys.into_iter().any(|key| {
            let current: Vec<SavedView<'_>> = self
                .entries
                .get(key)
                .filter(|entry| entry.selected)
                .map(|entry| saved_view(&entry.activities))
                .unwrap_or_default();
            let saved: Vec<SavedView<'_>> = self
                .saved
                .get(key)
                .map(|snapshot| saved_view(snapshot.activities()))
                .unwrap_or_default();
            current != saved
        })
    }
}

type SavedView<'a> = (&'a PayCodeId, Option<f64>, Option<f64>, Money);

fn saved_view(activities: &[Activity]) -> Vec<SavedView<'_>> {
    let mut view: Vec<SavedView<'_>> = activities
        .iter()
        .filter(|a| a.is_selected)
        .map(|a| {
            (
                &a.pay_code_id,
                a.units_produced,
                a.hours_applied,
                a.calculated_amount,
            )
        })
        .collect();
    view.sort_by_key(|entry| entry.0);
    view
}

/// JSON object keys must be strings, so keyed maps travel as lists of
/// `{ "key": ..., "value": ... }` pairs.
mod entry_map {
    use paylog_domain::WorkEntryKey;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct PairRef<'a, V> {
        key: &'a WorkEntryKey,
        value: &'a V,
    }

    #[derive(Deserialize)]
    struct Pair<V> {
        key: WorkEntryKey,
        value: V,
    }

    pub fn serialize<S, V>(
        map: &BTreeMap<WorkEntryKey, V>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        serializer.collect_seq(map.iter().map(|(key, value)| PairRef { key, value }))
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<BTreeMap<WorkEntryKey, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        let pairs: Vec<Pair<V>> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().map(|pair| (pair.key, pair.value)).collect())
    }
}
