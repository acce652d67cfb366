// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::{Date, Weekday};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            #[must_use]
            pub fn new(value: &str) -> Self {
                Self(value.to_string())
            }

            /// Returns the identifier value.
            #[must_use]
            pub fn value(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_id!(
    /// Identifies an employee (staff member).
    EmployeeId
);
string_id!(
    /// Identifies a job (production line, route, or role assignment).
    JobId
);
string_id!(
    /// Identifies a pay code in the catalog.
    PayCodeId
);

/// Identifies one row of work: an employee working a job on the log date.
///
/// All per-row state (hours, forced overtime, tray counts, doubling,
/// activities) is keyed by this pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkEntryKey {
    /// The employee.
    pub employee: EmployeeId,
    /// The job.
    pub job: JobId,
}

impl WorkEntryKey {
    /// Creates a new `WorkEntryKey`.
    #[must_use]
    pub fn new(employee: &str, job: &str) -> Self {
        Self {
            employee: EmployeeId::new(employee),
            job: JobId::new(job),
        }
    }
}

impl std::fmt::Display for WorkEntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.employee, self.job)
    }
}

/// The rate column that applies on a log date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayType {
    /// Ordinary working day.
    #[default]
    Biasa,
    /// Sunday.
    Ahad,
    /// Registered public holiday.
    Umum,
}

impl DayType {
    /// Derives the day type for a date.
    ///
    /// A registered, active holiday wins over Sunday.
    #[must_use]
    pub fn for_date(date: Date, is_holiday: bool) -> Self {
        if is_holiday {
            Self::Umum
        } else if date.weekday() == Weekday::Sunday {
            Self::Ahad
        } else {
            Self::Biasa
        }
    }

    /// Returns the display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Biasa => "Biasa",
            Self::Ahad => "Ahad",
            Self::Umum => "Umum",
        }
    }
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies what a pay code compensates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayType {
    /// Ordinary wage.
    Base,
    /// Hours beyond the overtime threshold.
    Overtime,
    /// Allowance-like extra. Never selected automatically.
    Tambahan,
}

/// The quantity basis used to price a pay code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateUnit {
    /// Rate per hour worked.
    Hour,
    /// Rate per day.
    Day,
    /// Rate per bag produced or loaded.
    Bag,
    /// Rate per trip.
    Trip,
    /// Rate is a percentage of a base amount carried in `units_produced`.
    Percent,
    /// Flat amount.
    Fixed,
    /// Any unit the engine does not recognise. Always priced at zero.
    #[serde(other)]
    Unknown,
}

impl RateUnit {
    /// Whether the unit needs a quantity typed in by a person.
    ///
    /// Such activities are never auto-selected and never auto-deselected.
    #[must_use]
    pub const fn is_quantity_entry(&self) -> bool {
        matches!(self, Self::Day | Self::Bag | Self::Trip)
    }
}

/// Which catalog layer a pay code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    /// Attached to the job.
    #[default]
    Job,
    /// Employee-specific override.
    Employee,
}

/// Where an activity originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySource {
    /// Job catalog entry.
    Job,
    /// Employee catalog entry.
    Employee,
    /// Substitute pay code injected while cleaning mode is active.
    CleaningMode,
}

impl From<CatalogSource> for ActivitySource {
    fn from(source: CatalogSource) -> Self {
        match source {
            CatalogSource::Job => Self::Job,
            CatalogSource::Employee => Self::Employee,
        }
    }
}

/// Why an activity is in its current selection state.
///
/// Everything other than `Default` is an explicit decision and is never
/// undone by the zero-amount deselect pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionBasis {
    /// Derived from catalog defaults.
    #[default]
    Default,
    /// Replayed from the saved snapshot.
    Saved,
    /// Toggled by a person.
    Manual,
    /// Forced by a named pay-code rule.
    Forced,
    /// Projected from a lead onto a follower.
    Cascade,
}

impl SelectionBasis {
    /// Whether the selection is an explicit decision.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        !matches!(self, Self::Default)
    }
}

/// Where a salesman-type lead worked on the log date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    /// Local route.
    Local,
    /// Outstation route.
    Outstation,
}

/// Whether a work log is being created or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    /// A new log; defaults apply.
    #[default]
    Create,
    /// An existing log; saved selections are replayed.
    Edit,
}

/// The kind of worker on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkerRole {
    /// Hour-based production worker.
    #[default]
    Standard,
    /// Salesman-type lead. Never hour-based.
    Salesman,
    /// Rides with a salesman and inherits allowances and commissions.
    Follower,
}

impl WorkerRole {
    /// Whether hour-based employee pay codes are dropped for this role.
    #[must_use]
    pub const fn excludes_hourly_codes(&self) -> bool {
        matches!(self, Self::Salesman)
    }
}
