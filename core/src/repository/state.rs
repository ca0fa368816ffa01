use serde::{Deserialize, Serialize};

use crate::model::grid::{BuildingLocation, Cell, GridCoord, GridState};

/// Where a loaded state came from. Everything except `Persisted` is a
/// recovery path that produced a fresh default map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateSource {
    Persisted,
    Missing,
    Empty,
    Degenerate,
    Regenerated,
}

impl StateSource {
    pub fn is_recovered(&self) -> bool {
        !matches!(self, StateSource::Persisted)
    }

    /// Warning to surface to the user, if this source warrants one. A
    /// missing file is the normal first run and gets none.
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            StateSource::Persisted | StateSource::Missing => None,
            StateSource::Empty => Some("map state file was empty; started a new map"),
            StateSource::Degenerate => Some("map state file had no map data; started a new map"),
            StateSource::Regenerated => Some("map state file was corrupt; started a new map"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub state: GridState,
    pub source: StateSource,
}

impl LoadOutcome {
    pub fn new(state: GridState, source: StateSource) -> Self {
        Self { state, source }
    }
}

/// On-disk shape of a `GridState`.
#[derive(Serialize, Deserialize, Debug, Default)]
pub(crate) struct PersistedMap {
    #[serde(default)]
    pub map_data: Option<Vec<Vec<String>>>,
    #[serde(default)]
    pub house_placed: bool,
    #[serde(default)]
    pub house_location: Option<GridCoord>,
    #[serde(default)]
    pub buildings_placed: bool,
    #[serde(default)]
    pub building_locations: Vec<BuildingLocation>,
}

impl PersistedMap {
    pub fn from_state(state: &GridState) -> Self {
        let map_data = state
            .rows()
            .map(|row| row.iter().map(|c| c.marker().to_string()).collect())
            .collect();

        Self {
            map_data: Some(map_data),
            house_placed: state.house_placed(),
            house_location: state.house_location(),
            buildings_placed: state.buildings_placed(),
            building_locations: state.building_locations().to_vec(),
        }
    }

    /// `Ok(None)` when there is no usable map data, an error string when the
    /// data is present but does not describe a valid grid.
    pub fn into_state(self, expected_size: usize) -> Result<Option<GridState>, String> {
        let rows = match self.map_data {
            Some(rows) if !rows.is_empty() => rows,
            _ => return Ok(None),
        };

        if rows.len() != expected_size {
            return Err(format!(
                "map has {} rows, expected {}",
                rows.len(),
                expected_size
            ));
        }

        let mut cells = Vec::with_capacity(rows.len());
        for (row, values) in rows.iter().enumerate() {
            let mut parsed = Vec::with_capacity(values.len());
            for (col, marker) in values.iter().enumerate() {
                let cell = Cell::from_marker(marker)
                    .ok_or_else(|| format!("empty marker at ({}, {})", row, col))?;
                parsed.push(cell);
            }
            cells.push(parsed);
        }

        GridState::restore(
            cells,
            self.house_placed,
            self.house_location,
            self.buildings_placed,
            self.building_locations,
        )
        .map(Some)
    }
}
