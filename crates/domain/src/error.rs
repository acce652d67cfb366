// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::leave::LeaveType;
use crate::types::EmployeeId;

/// Errors raised by domain rules.
///
/// Pricing and selection never fail: malformed catalog entries degrade to a
/// zero amount. Only policy violations surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Every applicable leave category is exhausted for the employee.
    #[error(
        "Employee '{employee}' has no remaining leave balance (checked: {})",
        format_leave_types(.checked)
    )]
    NoLeaveBalance {
        /// The employee that was being placed on leave.
        employee: EmployeeId,
        /// The leave categories that were considered.
        checked: Vec<LeaveType>,
    },
    /// The requested leave category has no remaining balance.
    #[error("Employee '{employee}' has no remaining {leave_type} balance")]
    LeaveTypeExhausted {
        /// The employee.
        employee: EmployeeId,
        /// The exhausted category.
        leave_type: LeaveType,
    },
    /// The requested leave category does not apply on the log date.
    #[error("{leave_type} is only available on public holidays")]
    LeaveTypeNotApplicable {
        /// The category that was requested.
        leave_type: LeaveType,
    },
    /// An entered count could not be interpreted.
    #[error("Invalid count for '{field}': {reason}")]
    InvalidCount {
        /// The input field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

fn format_leave_types(types: &[LeaveType]) -> String {
    types
        .iter()
        .map(LeaveType::as_str)
        .collect::<Vec<&str>>()
        .join(", ")
}
