// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pay-code catalog merge.
//!
//! One effective catalog is built per (employee, job) pair from the job's
//! pay-code list and the employee's overrides. Employee entries replace job
//! entries with the same identifier; there is no other precedence rule.

use crate::pay_code::PayCode;
use crate::types::{CatalogSource, PayCodeId, RateUnit, WorkerRole};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Options controlling the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogOptions {
    /// Drop hour-based entries from the employee layer before merging.
    ///
    /// Set for roles that are never paid by the hour.
    pub exclude_hourly_employee_codes: bool,
}

impl CatalogOptions {
    /// Options appropriate for a worker role.
    #[must_use]
    pub const fn for_role(role: WorkerRole) -> Self {
        Self {
            exclude_hourly_employee_codes: role.excludes_hourly_codes(),
        }
    }
}

/// The merged catalog for one work entry, ordered by pay-code id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectiveCatalog {
    entries: BTreeMap<PayCodeId, PayCode>,
}

impl EffectiveCatalog {
    /// Looks up a pay code.
    #[must_use]
    pub fn get(&self, id: &PayCodeId) -> Option<&PayCode> {
        self.entries.get(id)
    }

    /// Whether the catalog lists a pay code.
    #[must_use]
    pub fn contains(&self, id: &PayCodeId) -> bool {
        self.entries.contains_key(id)
    }

    /// Iterates pay codes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &PayCode> {
        self.entries.values()
    }

    /// Number of pay codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Merges a job's pay codes with an employee's overrides.
///
/// # Arguments
///
/// * `job_codes` - The job-level pay-code list
/// * `employee_codes` - The employee-specific pay-code list
/// * `options` - Merge options
///
/// # Returns
///
/// The effective catalog. Job entries are tagged `Job`, employee entries
/// `Employee`; an employee entry overwrites a job entry with the same id.
#[must_use]
pub fn merge_catalog(
    job_codes: &[PayCode],
    employee_codes: &[PayCode],
    options: CatalogOptions,
) -> EffectiveCatalog {
    let mut entries: BTreeMap<PayCodeId, PayCode> = BTreeMap::new();

    for code in job_codes {
        let mut entry: PayCode = code.clone();
        entry.source = CatalogSource::Job;
        entries.insert(entry.id.clone(), entry);
    }

    for code in employee_codes {
        if options.exclude_hourly_employee_codes && code.rate_unit == RateUnit::Hour {
            continue;
        }
        let mut entry: PayCode = code.clone();
        entry.source = CatalogSource::Employee;
        entries.insert(entry.id.clone(), entry);
    }

    EffectiveCatalog { entries }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::PayType;

    fn code(id: &str, unit: RateUnit, rate: f64) -> PayCode {
        PayCode::new(id, PayType::Base, unit, rate)
    }

    #[test]
    fn test_employee_entry_overrides_job_entry() {
        let job: Vec<PayCode> = vec![
            code("GAJI", RateUnit::Hour, 7.0),
            code("BAG", RateUnit::Bag, 0.2),
        ];
        let employee: Vec<PayCode> = vec![code("GAJI", RateUnit::Hour, 8.5)];

        let catalog: EffectiveCatalog = merge_catalog(&job, &employee, CatalogOptions::default());

        assert_eq!(catalog.len(), 2);
        let gaji: &PayCode = catalog.get(&PayCodeId::new("GAJI")).unwrap();
        assert_eq!(gaji.rates.biasa, 8.5);
        assert_eq!(gaji.source, CatalogSource::Employee);
        let bag: &PayCode = catalog.get(&PayCodeId::new("BAG")).unwrap();
        assert_eq!(bag.source, CatalogSource::Job);
    }

    #[test]
    fn test_incoming_source_tags_are_replaced() {
        let mut mislabelled: PayCode = code("X", RateUnit::Fixed, 1.0);
        mislabelled.source = CatalogSource::Employee;

        let catalog: EffectiveCatalog =
            merge_catalog(&[mislabelled], &[], CatalogOptions::default());

        assert_eq!(
            catalog.get(&PayCodeId::new("X")).unwrap().source,
            CatalogSource::Job
        );
    }

    #[test]
    fn test_hourly_employee_codes_dropped_for_salesman() {
        let job: Vec<PayCode> = vec![code("GAJI", RateUnit::Hour, 7.0)];
        let employee: Vec<PayCode> = vec![
            code("GAJI", RateUnit::Hour, 9.0),
            code("OT", RateUnit::Hour, 10.0),
            code("KOMISEN", RateUnit::Bag, 0.3),
        ];

        let catalog: EffectiveCatalog = merge_catalog(
            &job,
            &employee,
            CatalogOptions::for_role(WorkerRole::Salesman),
        );

        // the job-level hourly entry survives; only the employee layer is filtered
        let gaji: &PayCode = catalog.get(&PayCodeId::new("GAJI")).unwrap();
        assert_eq!(gaji.rates.biasa, 7.0);
        assert_eq!(gaji.source, CatalogSource::Job);
        assert!(!catalog.contains(&PayCodeId::new("OT")));
        assert!(catalog.contains(&PayCodeId::new("KOMISEN")));
    }

    #[test]
    fn test_iteration_is_ordered_by_id() {
        let job: Vec<PayCode> = vec![
            code("Z", RateUnit::Fixed, 1.0),
            code("A", RateUnit::Fixed, 1.0),
        ];
        let employee: Vec<PayCode> = vec![code("M", RateUnit::Fixed, 1.0)];

        let catalog: EffectiveCatalog = merge_catalog(&job, &employee, CatalogOptions::default());
        let ids: Vec<&str> = catalog.iter().map(|c| c.id.value()).collect();

        assert_eq!(ids, vec!["A", "M", "Z"]);
    }
}
