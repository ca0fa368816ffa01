use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::category::BuildingType;

/// How one category fared during placement.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CategoryPlacement {
    pub building_type: BuildingType,
    pub requested: u32,
    pub placed: u32,
    pub failed: u32,
}

/// Per-category outcome of a placement run, keyed by category code.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PlacementReport {
    pub categories: BTreeMap<String, CategoryPlacement>,
}

impl PlacementReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, category: &str, building_type: &BuildingType, requested: u32) {
        self.categories.insert(
            category.to_string(),
            CategoryPlacement {
                building_type: building_type.clone(),
                requested,
                placed: 0,
                failed: 0,
            },
        );
    }

    pub fn record_placed(&mut self, category: &str) {
        if let Some(entry) = self.categories.get_mut(category) {
            entry.placed += 1;
        }
    }

    pub fn record_failed(&mut self, category: &str) {
        if let Some(entry) = self.categories.get_mut(category) {
            entry.failed += 1;
        }
    }

    pub fn total_requested(&self) -> u32 {
        self.categories.values().map(|c| c.requested).sum()
    }

    pub fn total_placed(&self) -> u32 {
        self.categories.values().map(|c| c.placed).sum()
    }

    pub fn total_failed(&self) -> u32 {
        self.categories.values().map(|c| c.failed).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.total_failed() == 0
    }

    /// Categories that came up short, with their shortfall.
    pub fn shortfalls(&self) -> Vec<(&str, u32)> {
        self.categories
            .iter()
            .filter(|(_, c)| c.failed > 0)
            .map(|(category, c)| (category.as_str(), c.failed))
            .collect()
    }
}
