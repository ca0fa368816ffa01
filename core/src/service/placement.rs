use rand::Rng;
use tracing::{debug, warn};

use crate::error::{MapError, Result};
use crate::model::category::BuildingType;
use crate::model::grid::{BuildingLocation, Cell, GridCoord, GridState};

pub const DEFAULT_PLACEMENT_ATTEMPTS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HousePlacement {
    Placed(GridCoord),
    AlreadyPlaced(GridCoord),
}

impl HousePlacement {
    pub fn coord(&self) -> GridCoord {
        match self {
            HousePlacement::Placed(coord) | HousePlacement::AlreadyPlaced(coord) => *coord,
        }
    }
}

/// Places the house at the grid center and buildings at random empty cells.
///
/// The random source is owned by the engine and advances across calls, so a
/// seeded rng plus identical inputs gives an identical layout.
pub struct PlacementEngine<R: Rng> {
    rng: R,
    max_attempts: u32,
}

impl<R: Rng> PlacementEngine<R> {
    pub fn new(rng: R, max_attempts: u32) -> Self {
        Self { rng, max_attempts }
    }

    /// Idempotent. A second call leaves the state untouched.
    pub fn place_house(&self, state: &mut GridState) -> Result<HousePlacement> {
        if let (true, Some(coord)) = (state.house_placed(), state.house_location()) {
            debug!(row = coord.row, col = coord.col, "house already placed, skipping");
            return Ok(HousePlacement::AlreadyPlaced(coord));
        }

        let center = state.size() / 2;
        if !state.is_empty(center, center)? {
            return Err(MapError::HouseSiteOccupied {
                row: center,
                col: center,
            });
        }

        state.set_cell(center, center, Cell::House)?;
        let coord = GridCoord::new(center, center);
        state.record_house(coord);
        debug!(row = center, col = center, "house placed");
        Ok(HousePlacement::Placed(coord))
    }

    /// Draws random coordinates until one is empty or the attempt budget runs
    /// out. On exhaustion the state is left as it was.
    pub fn place_random(
        &mut self,
        state: &mut GridState,
        building_type: &BuildingType,
    ) -> Result<BuildingLocation> {
        let size = state.size();
        if size > 0 {
            for _ in 0..self.max_attempts {
                let row = self.rng.gen_range(0..size);
                let col = self.rng.gen_range(0..size);
                if state.is_empty(row, col)? {
                    state.set_cell(row, col, Cell::Building(building_type.clone()))?;
                    let location = BuildingLocation {
                        row,
                        col,
                        building_type: building_type.clone(),
                    };
                    state.record_building(location.clone());
                    return Ok(location);
                }
            }
        }

        Err(MapError::PlacementExhausted {
            building_type: building_type.clone(),
            attempts: self.max_attempts,
        })
    }

    /// `place_random` plus the `buildings_placed` flag. Exhaustion is logged
    /// and handed back so the caller can count it.
    pub fn add_building(
        &mut self,
        state: &mut GridState,
        building_type: &BuildingType,
    ) -> Result<BuildingLocation> {
        match self.place_random(state, building_type) {
            Ok(location) => {
                state.mark_buildings_placed();
                Ok(location)
            }
            Err(e) => {
                if let MapError::PlacementExhausted { .. } = e {
                    warn!(building = %building_type, "{}", e);
                }
                Err(e)
            }
        }
    }
}
