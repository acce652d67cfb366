// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::config::BagSlot;
use paylog_domain::{
    DayType, EmployeeId, LeaveBalances, LeaveType, LocationType, PayCodeId, WorkEntryKey,
};
use serde::{Deserialize, Serialize};

/// A command represents a caller-observed change as data only.
///
/// Commands are the only way to change a batch's inputs. Derived activities
/// are never edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Set the hours worked on an entry.
    SetHours {
        /// The entry.
        entry: WorkEntryKey,
        /// Hours worked.
        hours: f64,
    },
    /// Set the manually attested overtime on an entry.
    SetForcedOvertime {
        /// The entry.
        entry: WorkEntryKey,
        /// Forced overtime hours.
        hours: f64,
    },
    /// Set or clear the monthly overtime hours on an entry.
    SetMonthlyOvertime {
        /// The entry.
        entry: WorkEntryKey,
        /// Overtime hours, or `None` to fall back to the threshold rule.
        hours: Option<f64>,
    },
    /// Enter or clear a quantity for a pay code.
    SetUnits {
        /// The entry.
        entry: WorkEntryKey,
        /// The pay code.
        pay_code: PayCodeId,
        /// The quantity, or `None` to clear the manual entry.
        units: Option<f64>,
    },
    /// Set the externally tracked tray count on an entry.
    SetTrayCount {
        /// The entry.
        entry: WorkEntryKey,
        /// The tray count.
        count: u32,
    },
    /// Turn cleaning mode on or off for an entry.
    SetCleaningMode {
        /// The entry.
        entry: WorkEntryKey,
        /// Whether cleaning mode is active.
        active: bool,
    },
    /// Manually select or deselect an activity.
    ToggleActivity {
        /// The entry.
        entry: WorkEntryKey,
        /// The pay code.
        pay_code: PayCodeId,
        /// The new selection.
        selected: bool,
    },
    /// Drop a manual toggle so the selection rules decide again.
    ClearToggle {
        /// The entry.
        entry: WorkEntryKey,
        /// The pay code.
        pay_code: PayCodeId,
    },
    /// Select or deselect a work entry. Selecting an entry with no hours
    /// fills in the default full day for the log date.
    SelectEntry {
        /// The entry.
        entry: WorkEntryKey,
        /// Whether the employee works this job today.
        selected: bool,
    },
    /// Change the batch's day type.
    SetDayType {
        /// The new day type.
        day_type: DayType,
    },
    /// Set or clear a context field shared by every entry.
    SetContextField {
        /// The field name.
        field: String,
        /// The value, or `None` to remove the field.
        value: Option<f64>,
    },
    /// Set or clear the route location on a lead's entry.
    SetLocation {
        /// The entry.
        entry: WorkEntryKey,
        /// The location.
        location: Option<LocationType>,
    },
    /// Link a follower to a lead, or clear the link.
    SetLead {
        /// The follower.
        follower: EmployeeId,
        /// The lead, or `None` to clear the link.
        lead: Option<EmployeeId>,
    },
    /// Turn a follower's doubling flag on or off.
    SetDoubling {
        /// The follower.
        follower: EmployeeId,
        /// Whether quantities are doubled.
        doubling: bool,
    },
    /// Enter a manual bag count as the user typed it.
    SetBagCount {
        /// The follower.
        follower: EmployeeId,
        /// Which bag count.
        slot: BagSlot,
        /// The typed value; halved when doubling is active.
        displayed: f64,
    },
    /// Put an employee on leave, clearing their work selections.
    SelectLeave {
        /// The employee.
        employee: EmployeeId,
        /// The employee's current balances.
        balances: LeaveBalances,
        /// Whether the log date is a holiday.
        is_holiday: bool,
        /// An explicitly requested category, or `None` for the date's
        /// default with fallback.
        leave_type: Option<LeaveType>,
    },
    /// Take an employee off leave.
    ClearLeave {
        /// The employee.
        employee: EmployeeId,
    },
}
