// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave eligibility.
//!
//! This module provides read-only aggregation of leave entitlements and usage
//! to decide which leave categories an employee may take on a log date.

use crate::error::DomainError;
use crate::types::EmployeeId;
use serde::{Deserialize, Serialize};

/// A leave category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Sick leave.
    CutiSakit,
    /// Annual leave.
    CutiTahunan,
    /// Public holiday leave. Only applicable on a registered holiday.
    CutiUmum,
}

impl LeaveType {
    /// Fallback order when the default category is unavailable.
    pub const PREFERENCE: [Self; 3] = [Self::CutiSakit, Self::CutiTahunan, Self::CutiUmum];

    /// Returns the display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CutiSakit => "cuti_sakit",
            Self::CutiTahunan => "cuti_tahunan",
            Self::CutiUmum => "cuti_umum",
        }
    }

    /// The category offered first on a log date.
    #[must_use]
    pub const fn default_for(is_holiday: bool) -> Self {
        if is_holiday {
            Self::CutiUmum
        } else {
            Self::CutiSakit
        }
    }

    /// Whether the category can be taken on a log date.
    #[must_use]
    pub const fn applies_on(&self, is_holiday: bool) -> bool {
        match self {
            Self::CutiUmum => is_holiday,
            Self::CutiSakit | Self::CutiTahunan => true,
        }
    }
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entitlement and usage for one leave category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// Days allowed in the year.
    pub total: u16,
    /// Days already taken.
    pub taken: u16,
}

impl LeaveBalance {
    /// Creates a new `LeaveBalance`.
    #[must_use]
    pub const fn new(total: u16, taken: u16) -> Self {
        Self { total, taken }
    }

    /// `total − taken`. May be negative if overdrawn.
    #[must_use]
    pub fn remaining(&self) -> i32 {
        i32::from(self.total) - i32::from(self.taken)
    }
}

/// An employee's balances for every leave category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalances {
    /// The employee these balances belong to.
    pub employee: EmployeeId,
    /// Annual leave.
    #[serde(default)]
    pub annual: LeaveBalance,
    /// Sick leave.
    #[serde(default)]
    pub sick: LeaveBalance,
    /// Public holiday leave.
    #[serde(default)]
    pub public_holiday: LeaveBalance,
}

impl LeaveBalances {
    /// Creates balances with nothing allowed.
    #[must_use]
    pub fn new(employee: &str) -> Self {
        Self {
            employee: EmployeeId::new(employee),
            annual: LeaveBalance::default(),
            sick: LeaveBalance::default(),
            public_holiday: LeaveBalance::default(),
        }
    }

    /// Returns the balance for a category.
    #[must_use]
    pub const fn balance(&self, leave_type: LeaveType) -> LeaveBalance {
        match leave_type {
            LeaveType::CutiSakit => self.sick,
            LeaveType::CutiTahunan => self.annual,
            LeaveType::CutiUmum => self.public_holiday,
        }
    }
}

/// Result of an eligibility check for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAvailability {
    /// Whether the category can be taken on the log date.
    pub available: bool,
    /// Days remaining (`total` − `taken`).
    pub remaining: i32,
    /// Days allowed in the year.
    pub total_allowed: u16,
}

/// The category chosen for an employee going on leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveChoice {
    /// The category that will be used.
    pub leave_type: LeaveType,
    /// The category that was preferred for the date.
    pub default_type: LeaveType,
    /// Whether the default was unavailable and a fallback was used.
    pub used_fallback: bool,
}

/// Checks whether one leave category can be taken.
///
/// # Arguments
///
/// * `balances` - The employee's balances
/// * `leave_type` - The category to check
/// * `is_holiday` - Whether the log date is a registered holiday
#[must_use]
pub fn resolve_leave_eligibility(
    balances: &LeaveBalances,
    leave_type: LeaveType,
    is_holiday: bool,
) -> LeaveAvailability {
    let balance: LeaveBalance = balances.balance(leave_type);
    let remaining: i32 = balance.remaining();

    LeaveAvailability {
        available: leave_type.applies_on(is_holiday) && remaining > 0,
        remaining,
        total_allowed: balance.total,
    }
}

/// The categories usable on a log date, in preference order.
#[must_use]
pub fn available_leave_types(balances: &LeaveBalances, is_holiday: bool) -> Vec<LeaveType> {
    LeaveType::PREFERENCE
        .into_iter()
        .filter(|t| resolve_leave_eligibility(balances, *t, is_holiday).available)
        .collect()
}

/// Chooses the leave category for an employee.
///
/// The date's default category is used when it has a remaining balance;
/// otherwise the first available category in [`LeaveType::PREFERENCE`].
///
/// # Errors
///
/// Returns `DomainError::NoLeaveBalance` if no applicable category has a
/// remaining balance.
pub fn choose_leave_type(
    balances: &LeaveBalances,
    is_holiday: bool,
) -> Result<LeaveChoice, DomainError> {
    let default_type: LeaveType = LeaveType::default_for(is_holiday);
    let available: Vec<LeaveType> = available_leave_types(balances, is_holiday);

    if available.contains(&default_type) {
        return Ok(LeaveChoice {
            leave_type: default_type,
            default_type,
            used_fallback: false,
        });
    }

    available.first().map_or_else(
        || {
            Err(DomainError::NoLeaveBalance {
                employee: balances.employee.clone(),
                checked: LeaveType::PREFERENCE
                    .into_iter()
                    .filter(|t| t.applies_on(is_holiday))
                    .collect(),
            })
        },
        |fallback| {
            Ok(LeaveChoice {
                leave_type: *fallback,
                default_type,
                used_fallback: true,
            })
        },
    )
}

/// Validates an explicitly requested category.
///
/// # Errors
///
/// Returns an error if the category does not apply on the date or has no
/// remaining balance.
pub fn validate_leave_type(
    balances: &LeaveBalances,
    leave_type: LeaveType,
    is_holiday: bool,
) -> Result<(), DomainError> {
    if !leave_type.applies_on(is_holiday) {
        return Err(DomainError::LeaveTypeNotApplicable { leave_type });
    }
    if !resolve_leave_eligibility(balances, leave_type, is_holiday).available {
        return Err(DomainError::LeaveTypeExhausted {
            employee: balances.employee.clone(),
            leave_type,
        });
    }
    Ok(())
}
