// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference-data collaborators.
//!
//! The engine never talks to a data store. Everything it needs about jobs,
//! employees, holidays, leave and sales arrives through these traits, already
//! loaded into memory.

use crate::error::ReferenceError;
use paylog_domain::{DayType, EmployeeId, JobId, LeaveBalances, PayCode};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use time::{Date, Duration, OffsetDateTime};
use tracing::debug;

/// Supplies job pay-code lists and employee overrides.
pub trait PayCodeProvider {
    /// The pay codes attached to a job.
    ///
    /// # Errors
    ///
    /// Returns an error if the job is unknown or the lookup fails.
    fn job_pay_codes(&self, job: &JobId) -> Result<Vec<PayCode>, ReferenceError>;

    /// The employee-specific pay codes for an employee working a job.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails. An employee with no overrides
    /// yields an empty list, not an error.
    fn employee_pay_codes(
        &self,
        employee: &EmployeeId,
        job: &JobId,
    ) -> Result<Vec<PayCode>, ReferenceError>;
}

/// A registered holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The date.
    pub date: Date,
    /// What the holiday is.
    pub description: String,
    /// Inactive holidays are kept for history but do not change the day type.
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

/// Answers whether a date is a public holiday.
pub trait HolidayCalendar {
    /// The active holiday on a date, if any.
    fn holiday(&self, date: Date) -> Option<Holiday>;

    /// Whether the date is an active holiday.
    fn is_holiday(&self, date: Date) -> bool {
        self.holiday(date).is_some()
    }

    /// The day type for a date.
    fn day_type(&self, date: Date) -> DayType {
        DayType::for_date(date, self.is_holiday(date))
    }
}

/// Supplies leave balances.
pub trait LeaveBalanceProvider {
    /// The employee's balances for the year of the log date.
    ///
    /// # Errors
    ///
    /// Returns an error if the employee is unknown or the lookup fails.
    fn leave_balances(
        &self,
        employee: &EmployeeId,
        year: i32,
    ) -> Result<LeaveBalances, ReferenceError>;
}

/// One product sold by a salesman on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSale {
    /// The product.
    pub product_id: String,
    /// Quantity sold.
    pub quantity: f64,
    /// The sale date.
    pub date: Date,
}

/// Supplies per-salesman, per-date product quantities.
pub trait ProductSalesProvider {
    /// The salesman's sales on a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn product_sales(
        &self,
        salesman: &EmployeeId,
        date: Date,
    ) -> Result<Vec<ProductSale>, ReferenceError>;
}

/// The collaborators a recalculation reads from.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Pay-code catalogs.
    pub pay_codes: &'a dyn PayCodeProvider,
    /// Product sales for leads.
    pub product_sales: &'a dyn ProductSalesProvider,
}

impl<'a> Collaborators<'a> {
    /// Uses one value for every collaborator.
    #[must_use]
    pub fn from_single<R>(reference: &'a R) -> Self
    where
        R: PayCodeProvider + ProductSalesProvider,
    {
        Self {
            pay_codes: reference,
            product_sales: reference,
        }
    }
}

/// Reference data held entirely in memory.
///
/// Implements every collaborator trait; deserializable so a whole scenario
/// can be loaded from one document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InMemoryReference {
    /// Pay codes per job.
    #[serde(default)]
    pub jobs: BTreeMap<JobId, Vec<PayCode>>,
    /// Employee overrides, applied on every job the employee works.
    #[serde(default)]
    pub employees: BTreeMap<EmployeeId, Vec<PayCode>>,
    /// Registered holidays.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    /// Leave balances per employee.
    #[serde(default)]
    pub leave_balances: Vec<LeaveBalances>,
    /// Product sales per salesman.
    #[serde(default)]
    pub product_sales: BTreeMap<EmployeeId, Vec<ProductSale>>,
}

impl PayCodeProvider for InMemoryReference {
    fn job_pay_codes(&self, job: &JobId) -> Result<Vec<PayCode>, ReferenceError> {
        self.jobs
            .get(job)
            .cloned()
            .ok_or_else(|| ReferenceError::NotFound(format!("job '{job}'")))
    }

    fn employee_pay_codes(
        &self,
        employee: &EmployeeId,
        _job: &JobId,
    ) -> Result<Vec<PayCode>, ReferenceError> {
        Ok(self.employees.get(employee).cloned().unwrap_or_default())
    }
}

impl HolidayCalendar for InMemoryReference {
    fn holiday(&self, date: Date) -> Option<Holiday> {
        self.holidays
            .iter()
            .find(|h| h.active && h.date == date)
            .cloned()
    }
}

impl LeaveBalanceProvider for InMemoryReference {
    fn leave_balances(
        &self,
        employee: &EmployeeId,
        _year: i32,
    ) -> Result<LeaveBalances, ReferenceError> {
        self.leave_balances
            .iter()
            .find(|b| &b.employee == employee)
            .cloned()
            .ok_or_else(|| ReferenceError::NotFound(format!("leave balances for '{employee}'")))
    }
}

impl ProductSalesProvider for InMemoryReference {
    fn product_sales(
        &self,
        salesman: &EmployeeId,
        date: Date,
    ) -> Result<Vec<ProductSale>, ReferenceError> {
        Ok(self
            .product_sales
            .get(salesman)
            .map(|sales| sales.iter().filter(|s| s.date == date).cloned().collect())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
struct CachedCodes {
    codes: Vec<PayCode>,
    fetched_at: OffsetDateTime,
}

type Clock = Box<dyn Fn() -> OffsetDateTime>;

/// Read-through cache over a [`PayCodeProvider`].
///
/// Entries are served for at most `staleness` after they were fetched; the
/// next read after that goes back to the provider. `invalidate` drops
/// everything and `refresh_job` forces a re-fetch of one job immediately.
/// The engine is single-threaded, so the cache uses interior mutability
/// rather than locking.
pub struct ReferenceCache<P> {
    provider: P,
    staleness: Duration,
    clock: Clock,
    jobs: RefCell<BTreeMap<JobId, CachedCodes>>,
    employees: RefCell<BTreeMap<(EmployeeId, JobId), CachedCodes>>,
}

impl<P: PayCodeProvider> ReferenceCache<P> {
    /// Wraps a provider using the system clock.
    #[must_use]
    pub fn new(provider: P, staleness: Duration) -> Self {
        Self::with_clock(provider, staleness, Box::new(OffsetDateTime::now_utc))
    }

    /// Wraps a provider with an explicit clock.
    #[must_use]
    pub fn with_clock(provider: P, staleness: Duration, clock: Clock) -> Self {
        Self {
            provider,
            staleness,
            clock,
            jobs: RefCell::new(BTreeMap::new()),
            employees: RefCell::new(BTreeMap::new()),
        }
    }

    /// The configured staleness window.
    #[must_use]
    pub const fn staleness(&self) -> Duration {
        self.staleness
    }

    /// Drops every cached entry.
    pub fn invalidate(&self) {
        debug!("Invalidating reference cache");
        self.jobs.borrow_mut().clear();
        self.employees.borrow_mut().clear();
    }

    /// Drops the cached entries for one job.
    pub fn invalidate_job(&self, job: &JobId) {
        self.jobs.borrow_mut().remove(job);
        self.employees.borrow_mut().retain(|(_, j), _| j != job);
    }

    /// Re-fetches one job's pay codes now.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; the previous entry is dropped either way.
    pub fn refresh_job(&self, job: &JobId) -> Result<Vec<PayCode>, ReferenceError> {
        self.invalidate_job(job);
        self.job_pay_codes(job)
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.borrow().len() + self.employees.borrow().len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_fresh(&self, entry: &CachedCodes, now: OffsetDateTime) -> bool {
        now - entry.fetched_at <= self.staleness
    }
}

impl<P: PayCodeProvider> PayCodeProvider for ReferenceCache<P> {
    fn job_pay_codes(&self, job: &JobId) -> Result<Vec<PayCode>, ReferenceError> {
        let now: OffsetDateTime = (self.clock)();
        if let Some(entry) = self.jobs.borrow().get(job) {
            if self.is_fresh(entry, now) {
                return Ok(entry.codes.clone());
            }
        }

        debug!(job = %job, "Fetching job pay codes");
        let codes: Vec<PayCode> = self.provider.job_pay_codes(job)?;
        self.jobs.borrow_mut().insert(
            job.clone(),
            CachedCodes {
                codes: codes.clone(),
                fetched_at: now,
            },
        );
        Ok(codes)
    }

    fn employee_pay_codes(
        &self,
        employee: &EmployeeId,
        job: &JobId,
    ) -> Result<Vec<PayCode>, ReferenceError> {
        let now: OffsetDateTime = (self.clock)();
        let key: (EmployeeId, JobId) = (employee.clone(), job.clone());
        if let Some(entry) = self.employees.borrow().get(&key) {
            if self.is_fresh(entry, now) {
                return Ok(entry.codes.clone());
            }
        }

        debug!(employee = %employee, job = %job, "Fetching employee pay codes");
        let codes: Vec<PayCode> = self.provider.employee_pay_codes(employee, job)?;
        self.employees.borrow_mut().insert(
            key,
            CachedCodes {
                codes: codes.clone(),
                fetched_at: now,
            },
        );
        Ok(codes)
    }
}
