// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engine configuration.
//!
//! Named pay codes with hard-coded behaviour live here rather than in the
//! rules, so a catalog rename is a configuration change. Every field has a
//! default, so an empty JSON object is a valid configuration.

use paylog_domain::{LocationType, PayCode, PayCodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Duration;

/// Which manually entered bag count a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BagSlot {
    /// The first bag-count commission.
    First,
    /// The second bag-count commission.
    Second,
}

/// Pay codes driven by the lead/follower relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleCodes {
    /// Allowance for a local route.
    pub local_allowance: PayCodeId,
    /// Allowance for an outstation route.
    pub outstation_allowance: PayCodeId,
    /// Commission driven by the first manual bag count.
    pub first_bag_commission: PayCodeId,
    /// Commission driven by the second manual bag count.
    pub second_bag_commission: PayCodeId,
}

impl Default for RoleCodes {
    fn default() -> Self {
        Self {
            local_allowance: PayCodeId::new("ELAUN_MT"),
            outstation_allowance: PayCodeId::new("ELAUN_MO"),
            first_bag_commission: PayCodeId::new("BAG_COMM_1"),
            second_bag_commission: PayCodeId::new("BAG_COMM_2"),
        }
    }
}

impl RoleCodes {
    /// The allowance pay code matching a location.
    #[must_use]
    pub const fn allowance_for(&self, location: LocationType) -> &PayCodeId {
        match location {
            LocationType::Local => &self.local_allowance,
            LocationType::Outstation => &self.outstation_allowance,
        }
    }

    /// The commission pay code for a bag-count slot.
    #[must_use]
    pub const fn bag_commission(&self, slot: BagSlot) -> &PayCodeId {
        match slot {
            BagSlot::First => &self.first_bag_commission,
            BagSlot::Second => &self.second_bag_commission,
        }
    }
}

/// Pay codes with hard-coded selection rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialCodes {
    /// Selected automatically when the entry's tray count is above zero.
    pub tray: PayCodeId,
    /// Force-selected while cleaning mode is active.
    pub cleaning: PayCodeId,
    /// Definition injected when cleaning mode is active and the catalog does
    /// not list the cleaning pay code.
    pub cleaning_pay_code: Option<PayCode>,
}

impl Default for SpecialCodes {
    fn default() -> Self {
        Self {
            tray: PayCodeId::new("DULANG"),
            cleaning: PayCodeId::new("CUCI"),
            cleaning_pay_code: None,
        }
    }
}

/// Maps a lead's products to the follower's commission pay codes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommissionTable {
    products: BTreeMap<String, PayCodeId>,
}

impl CommissionTable {
    /// Creates a table from `(product id, pay code)` pairs.
    #[must_use]
    pub fn new<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            products: pairs
                .into_iter()
                .map(|(product, code)| (product.to_string(), PayCodeId::new(code)))
                .collect(),
        }
    }

    /// The commission pay code for a product.
    #[must_use]
    pub fn pay_code_for(&self, product_id: &str) -> Option<&PayCodeId> {
        self.products.get(product_id)
    }

    /// Every mapped pay code, deduplicated and ordered.
    #[must_use]
    pub fn mapped_pay_codes(&self) -> Vec<&PayCodeId> {
        let mut codes: Vec<&PayCodeId> = self.products.values().collect();
        codes.sort();
        codes.dedup();
        codes
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lead/follower pay codes.
    pub role_codes: RoleCodes,
    /// Pay codes with hard-coded selection rules.
    pub special_codes: SpecialCodes,
    /// Product → commission mapping.
    pub commission_table: CommissionTable,
    /// How long cached reference data may be served, in seconds.
    pub cache_staleness_secs: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            role_codes: RoleCodes::default(),
            special_codes: SpecialCodes::default(),
            commission_table: CommissionTable::default(),
            cache_staleness_secs: 300,
        }
    }
}

impl EngineConfig {
    /// The cache staleness window.
    #[must_use]
    pub fn cache_staleness(&self) -> Duration {
        Duration::seconds(i64::from(self.cache_staleness_secs))
    }
}
