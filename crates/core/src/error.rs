// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use paylog_domain::{DomainError, EmployeeId, PayCodeId, WorkEntryKey};

/// Errors raised by a reference-data collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    /// The collaborator has no record of the requested item.
    #[error("Reference data not found: {0}")]
    NotFound(String),
    /// The collaborator could not answer.
    #[error("Reference data unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while applying commands or recalculating a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A domain rule was violated.
    #[error("Domain violation: {0}")]
    DomainViolation(#[from] DomainError),
    /// A collaborator failed.
    #[error("Reference lookup failed: {0}")]
    Reference(#[from] ReferenceError),
    /// The command names a work entry that is not in the batch.
    #[error("Work entry {0} not found")]
    UnknownEntry(WorkEntryKey),
    /// The command names an employee that has no work entry in the batch.
    #[error("Employee '{0}' not found in batch")]
    UnknownEmployee(EmployeeId),
    /// The command names a pay code the entry's catalog does not list.
    #[error("Pay code '{pay_code}' not found on work entry {entry}")]
    UnknownPayCode {
        /// The entry.
        entry: WorkEntryKey,
        /// The pay code.
        pay_code: PayCodeId,
    },
    /// The command targets a follower setting on an employee with no lead link.
    #[error("Employee '{0}' is not a follower")]
    NotAFollower(EmployeeId),
    /// Role links form a cycle, so no lead-first order exists.
    #[error("Role links form a cycle through employee '{0}'")]
    RoleCycle(EmployeeId),
    /// An employee cannot follow themselves.
    #[error("Employee '{0}' cannot follow themselves")]
    SelfLead(EmployeeId),
}
