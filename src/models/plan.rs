// Plan models for representing computed purchase strategies

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::models::{Cost, Km, ProductId, StoreId};

/// The three purchase strategies the optimizer produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    /// Minimize raw price, store count is only a tie-breaker
    Cheapest,
    /// Price traded against store count and distance via the slider
    Balanced,
    /// Every fulfillable item bought at one store
    SingleStore,
}

impl PlanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanKind::Cheapest => "cheapest",
            PlanKind::Balanced => "balanced",
            PlanKind::SingleStore => "single_store",
        }
    }
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fully computed purchase plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub kind: PlanKind,

    /// Adjusted cost: raw price plus store and distance penalties
    pub total: Cost,

    /// Sum of the chosen offer prices, what the user actually pays
    pub raw_total: Cost,

    /// Number of distinct stores in the assignment
    pub stores_used: usize,

    /// Estimated travel distance in kilometers
    pub km_est: Km,

    /// Product identifier -> chosen store identifier
    pub assignments: BTreeMap<ProductId, StoreId>,

    /// Products that could not be bought under this plan
    #[serde(default)]
    pub omitted: Vec<ProductId>,
}

impl Plan {
    /// A plan that buys nothing
    pub fn empty(kind: PlanKind) -> Self {
        Self {
            kind,
            total: 0.0,
            raw_total: 0.0,
            stores_used: 0,
            km_est: 0.0,
            assignments: BTreeMap::new(),
            omitted: Vec::new(),
        }
    }

    /// Same plan under a different label
    pub fn relabeled(mut self, kind: PlanKind) -> Self {
        self.kind = kind;
        self
    }

    /// Distinct store identifiers used by the assignment
    pub fn distinct_stores(&self) -> BTreeSet<&str> {
        self.assignments.values().map(|s| s.as_str()).collect()
    }

    /// Checks if this plan should replace `other` as the best candidate.
    /// Only a strictly lower adjusted total wins, so earlier candidates keep ties.
    pub fn beats(&self, other: &Plan) -> bool {
        self.total < other.total
    }
}
