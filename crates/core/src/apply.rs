// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::config::BagSlot;
use crate::error::EngineError;
use crate::state::{Batch, LeaveSelection, RoleLink, WorkEntry};
use paylog_domain::{
    DoubledCount, EmployeeId, LeaveChoice, PayCodeId, WorkEntryKey, choose_leave_type,
    find_activity, validate_leave_type,
};
use tracing::debug;

/// Applies a command to a batch, producing a new batch.
///
/// Transitions are atomic: on error the input batch is untouched and no
/// partial change is visible. Derived activities are not recomputed here;
/// run the orchestrator afterwards.
///
/// # Arguments
///
/// * `batch` - The current batch (immutable)
/// * `command` - The command to apply
///
/// # Returns
///
/// * `Ok(Batch)` containing the new inputs
/// * `Err(EngineError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The command names an entry, employee or pay code the batch does not have
/// - A follower setting targets an employee with no lead link
/// - A lead link would point at the follower or close a cycle
/// - A leave selection violates the leave rules
/// - A bag count is not a valid count
#[allow(clippy::too_many_lines)]
pub fn apply(batch: &Batch, command: Command) -> Result<Batch, EngineError> {
    let mut next: Batch = batch.clone();

    match command {
        Command::SetHours { entry, hours } => {
            entry_mut(&mut next, &entry)?.inputs.hours = hours;
        }
        Command::SetForcedOvertime { entry, hours } => {
            entry_mut(&mut next, &entry)?.inputs.forced_overtime_hours = hours;
        }
        Command::SetMonthlyOvertime { entry, hours } => {
            entry_mut(&mut next, &entry)?.inputs.overtime_hours = hours;
        }
        Command::SetUnits {
            entry,
            pay_code,
            units,
        } => {
            let work: &mut WorkEntry = entry_mut(&mut next, &entry)?;
            require_pay_code(work, &entry, &pay_code)?;
            match units {
                Some(value) => work.inputs.units.insert(pay_code, value),
                None => work.inputs.units.remove(&pay_code),
            };
        }
        Command::SetTrayCount { entry, count } => {
            entry_mut(&mut next, &entry)?.inputs.tray_count = count;
        }
        Command::SetCleaningMode { entry, active } => {
            entry_mut(&mut next, &entry)?.inputs.cleaning_mode = active;
        }
        Command::ToggleActivity {
            entry,
            pay_code,
            selected,
        } => {
            let work: &mut WorkEntry = entry_mut(&mut next, &entry)?;
            require_pay_code(work, &entry, &pay_code)?;
            work.inputs.selection_overrides.insert(pay_code, selected);
        }
        Command::ClearToggle { entry, pay_code } => {
            entry_mut(&mut next, &entry)?
                .inputs
                .selection_overrides
                .remove(&pay_code);
        }
        Command::SelectEntry { entry, selected } => {
            if !next.set_entry_selected(&entry, selected) {
                return Err(EngineError::UnknownEntry(entry));
            }
        }
        Command::SetDayType { day_type } => {
            next.day_type = day_type;
        }
        Command::SetContextField { field, value } => match value {
            Some(v) => next.context.set(&field, v),
            None => next.context.remove(&field),
        },
        Command::SetLocation { entry, location } => {
            entry_mut(&mut next, &entry)?.inputs.location = location;
        }
        Command::SetLead { follower, lead } => {
            set_lead(&mut next, follower, lead)?;
        }
        Command::SetDoubling { follower, doubling } => {
            link_mut(&mut next, &follower)?.doubling = doubling;
        }
        Command::SetBagCount {
            follower,
            slot,
            displayed,
        } => {
            let link: &mut RoleLink = link_mut(&mut next, &follower)?;
            let count: DoubledCount =
                DoubledCount::from_display(slot_field(slot), displayed, link.doubling)?;
            link.bag_counts.set(slot, count);
        }
        Command::SelectLeave {
            employee,
            balances,
            is_holiday,
            leave_type,
        } => {
            let choice: LeaveChoice = match leave_type {
                Some(requested) => {
                    validate_leave_type(&balances, requested, is_holiday)?;
                    LeaveChoice {
                        leave_type: requested,
                        default_type: requested,
                        used_fallback: false,
                    }
                }
                None => choose_leave_type(&balances, is_holiday)?,
            };
            if choice.used_fallback {
                debug!(
                    employee = %employee,
                    default = %choice.default_type,
                    chosen = %choice.leave_type,
                    "Default leave category exhausted, using fallback"
                );
            }
            next.select_leave(&employee, LeaveSelection::from(choice));
        }
        Command::ClearLeave { employee } => {
            next.clear_leave(&employee);
        }
    }

    Ok(next)
}

fn entry_mut<'a>(
    batch: &'a mut Batch,
    key: &WorkEntryKey,
) -> Result<&'a mut WorkEntry, EngineError> {
    batch
        .entries
        .get_mut(key)
        .ok_or_else(|| EngineError::UnknownEntry(key.clone()))
}

fn link_mut<'a>(
    batch: &'a mut Batch,
    follower: &EmployeeId,
) -> Result<&'a mut RoleLink, EngineError> {
    if !batch.is_follower(follower) {
        return Err(EngineError::NotAFollower(follower.clone()));
    }
    batch
        .role_links
        .get_mut(follower)
        .ok_or_else(|| EngineError::NotAFollower(follower.clone()))
}

/// Pay codes can only be targeted once the entry has been built.
fn require_pay_code(
    work: &WorkEntry,
    entry: &WorkEntryKey,
    pay_code: &PayCodeId,
) -> Result<(), EngineError> {
    if find_activity(&work.activities, pay_code).is_none() {
        return Err(EngineError::UnknownPayCode {
            entry: entry.clone(),
            pay_code: pay_code.clone(),
        });
    }
    Ok(())
}

fn set_lead(
    batch: &mut Batch,
    follower: EmployeeId,
    lead: Option<EmployeeId>,
) -> Result<(), EngineError> {
    if !batch.has_employee(&follower) {
        return Err(EngineError::UnknownEmployee(follower));
    }

    let Some(lead) = lead else {
        batch.role_links.remove(&follower);
        return Ok(());
    };

    if lead == follower {
        return Err(EngineError::SelfLead(follower));
    }
    if !batch.is_follower(&follower) {
        return Err(EngineError::NotAFollower(follower));
    }
    if !batch.has_employee(&lead) {
        return Err(EngineError::UnknownEmployee(lead));
    }

    // Walk the lead's own chain; reaching the follower would close a cycle.
    let mut current: Option<&EmployeeId> = Some(&lead);
    let mut steps: usize = 0;
    while let Some(employee) = current {
        if employee == &follower || steps > batch.role_links.len() {
            return Err(EngineError::RoleCycle(follower));
        }
        current = batch.role_links.get(employee).map(|link| &link.lead);
        steps += 1;
    }

    // Changing the lead keeps the follower's own settings.
    match batch.role_links.get_mut(&follower) {
        Some(link) => link.lead = lead,
        None => {
            batch.role_links.insert(follower, RoleLink::new(lead));
        }
    }
    Ok(())
}

const fn slot_field(slot: BagSlot) -> &'static str {
    match slot {
        BagSlot::First => "first_bag_count",
        BagSlot::Second => "second_bag_count",
    }
}
