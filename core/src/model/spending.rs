use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One raw spending record as supplied in the user's spending file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpendingEntry {
    pub date: String,
    pub category: String,
    pub amount: f64,
}

impl SpendingEntry {
    pub fn new(date: impl Into<String>, category: impl Into<String>, amount: f64) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            amount,
        }
    }
}

// Ordered by category code so that placement draws happen in a stable order
// for a given seed.
pub type CategoryTotals = BTreeMap<String, f64>;

pub type BuildingCount = BTreeMap<String, u32>;
