//! One-way hand-off of a finished map to whatever draws it.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::model::category::BuildingType;
use crate::model::grid::{Cell, GridCoord, GridState};
use crate::model::spending::SpendingEntry;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Display details for a building, derived from the spending behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct CellAnnotation {
    pub built_date: String,
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct CellVisit<'a> {
    pub coord: GridCoord,
    pub cell: &'a Cell,
    pub marker: &'a str,
    pub annotation: Option<&'a CellAnnotation>,
}

pub trait MapRenderer {
    fn visit(&mut self, cell: &CellVisit<'_>);
}

#[derive(Debug, Clone, Default)]
pub struct AnnotationIndex {
    by_type: HashMap<BuildingType, CellAnnotation>,
}

#[derive(Default)]
struct Accumulator {
    categories: BTreeSet<String>,
    amount: f64,
    latest: Option<NaiveDate>,
    last_raw: String,
}

impl AnnotationIndex {
    /// Groups entries by the building type their category maps to. The built
    /// date is the latest `YYYY-MM-DD` date seen, or the last raw date string
    /// when none parse. Entries whose category has no valid marker are
    /// skipped.
    pub fn from_entries(entries: &[SpendingEntry]) -> Self {
        let mut acc: HashMap<BuildingType, Accumulator> = HashMap::new();
        for entry in entries {
            let Ok(building_type) = BuildingType::from_category(&entry.category) else {
                continue;
            };
            let slot = acc.entry(building_type).or_default();
            slot.categories.insert(entry.category.clone());
            slot.amount += entry.amount;
            if let Ok(date) = NaiveDate::parse_from_str(&entry.date, DATE_FORMAT) {
                slot.latest = slot.latest.max(Some(date));
            }
            slot.last_raw = entry.date.clone();
        }

        let by_type = acc
            .into_iter()
            .map(|(building_type, slot)| {
                let built_date = match slot.latest {
                    Some(date) => date.format(DATE_FORMAT).to_string(),
                    None => slot.last_raw,
                };
                let category = slot.categories.into_iter().collect::<Vec<_>>().join(", ");
                (
                    building_type,
                    CellAnnotation {
                        built_date,
                        category,
                        amount: slot.amount,
                    },
                )
            })
            .collect();

        Self { by_type }
    }

    pub fn get(&self, building_type: &BuildingType) -> Option<&CellAnnotation> {
        self.by_type.get(building_type)
    }

    pub fn for_cell(&self, cell: &Cell) -> Option<&CellAnnotation> {
        match cell {
            Cell::Building(building_type) => self.get(building_type),
            _ => None,
        }
    }
}

/// Calls the renderer once for every house and building cell, row-major.
/// Returns how many cells were visited.
pub fn render_map<M: MapRenderer + ?Sized>(
    state: &GridState,
    annotations: Option<&AnnotationIndex>,
    renderer: &mut M,
) -> usize {
    let mut visited = 0;
    for (coord, cell) in state.iter().filter(|(_, c)| c.is_occupied()) {
        let visit = CellVisit {
            coord,
            cell,
            marker: cell.marker(),
            annotation: annotations.and_then(|a| a.for_cell(cell)),
        };
        renderer.visit(&visit);
        visited += 1;
    }
    visited
}
