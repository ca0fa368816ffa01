use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::model::category::{BuildingType, EMPTY_MARKER, HOUSE_MARKER, ROAD_MARKER};

pub const DEFAULT_MAP_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Road,
    House,
    Building(BuildingType),
}

impl Cell {
    pub fn marker(&self) -> &str {
        match self {
            Cell::Empty => EMPTY_MARKER,
            Cell::Road => ROAD_MARKER,
            Cell::House => HOUSE_MARKER,
            Cell::Building(building_type) => building_type.as_str(),
        }
    }

    /// Any marker that isn't reserved reads back as a building, so unknown
    /// category codes survive a save/load cycle.
    pub fn from_marker(marker: &str) -> Option<Cell> {
        match marker {
            EMPTY_MARKER => Some(Cell::Empty),
            ROAD_MARKER => Some(Cell::Road),
            HOUSE_MARKER => Some(Cell::House),
            other => BuildingType::from_marker(other).map(Cell::Building),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// House or building.
    pub fn is_occupied(&self) -> bool {
        matches!(self, Cell::House | Cell::Building(_))
    }
}

/// Persisted as a `[row, col]` pair.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct GridCoord {
    pub row: usize,
    pub col: usize,
}

impl GridCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<[usize; 2]> for GridCoord {
    fn from([row, col]: [usize; 2]) -> Self {
        Self { row, col }
    }
}

impl From<GridCoord> for [usize; 2] {
    fn from(coord: GridCoord) -> Self {
        [coord.row, coord.col]
    }
}

/// Persisted as a `[row, col, building_type]` triple.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(
    from = "(usize, usize, BuildingType)",
    into = "(usize, usize, BuildingType)"
)]
pub struct BuildingLocation {
    pub row: usize,
    pub col: usize,
    pub building_type: BuildingType,
}

impl BuildingLocation {
    pub fn coord(&self) -> GridCoord {
        GridCoord::new(self.row, self.col)
    }
}

impl From<(usize, usize, BuildingType)> for BuildingLocation {
    fn from((row, col, building_type): (usize, usize, BuildingType)) -> Self {
        Self {
            row,
            col,
            building_type,
        }
    }
}

impl From<BuildingLocation> for (usize, usize, BuildingType) {
    fn from(location: BuildingLocation) -> Self {
        (location.row, location.col, location.building_type)
    }
}

/// Square grid of cells plus the placement bookkeeping that goes with it.
///
/// Rows with an odd index are roads. The house occupies at most one cell and
/// every entry in `building_locations` names a distinct cell holding that
/// building. Cells are stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    size: usize,
    cells: Vec<Cell>,
    house_placed: bool,
    house_location: Option<GridCoord>,
    buildings_placed: bool,
    building_locations: Vec<BuildingLocation>,
}

impl GridState {
    /// A fresh map: roads stamped in, no house, no buildings.
    pub fn new(size: usize) -> Self {
        let mut state = Self::blank(size);
        state.stamp_roads();
        state
    }

    /// All cells `Empty`, roads not yet stamped.
    pub fn blank(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
            house_placed: false,
            house_location: None,
            buildings_placed: false,
            building_locations: Vec::new(),
        }
    }

    pub fn stamp_roads(&mut self) {
        for row in (1..self.size).step_by(2) {
            for col in 0..self.size {
                self.cells[row * self.size + col] = Cell::Road;
            }
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&Cell> {
        let index = self.index(row, col)?;
        Ok(&self.cells[index])
    }

    pub fn is_empty(&self, row: usize, col: usize) -> Result<bool> {
        Ok(self.get(row, col)?.is_empty())
    }

    /// Fills an empty cell with the house or a building. Roads and filled
    /// cells are never overwritten. House and building bookkeeping is not
    /// touched; `PlacementEngine` keeps those in step.
    pub(crate) fn set_cell(&mut self, row: usize, col: usize, cell: Cell) -> Result<()> {
        let index = self.index(row, col)?;
        let reason = match (&self.cells[index], &cell) {
            (_, Cell::Empty | Cell::Road) => Some("only a house or building can be placed"),
            (Cell::Road, _) => Some("cell is a road"),
            (Cell::House | Cell::Building(_), _) => Some("cell is already occupied"),
            (Cell::Empty, _) => None,
        };
        if let Some(reason) = reason {
            return Err(MapError::CellNotWritable { row, col, reason });
        }
        self.cells[index] = cell;
        Ok(())
    }

    /// Row-major walk over every cell.
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &Cell)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (GridCoord::new(i / size, i % size), cell))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        // chunks() panics on 0
        self.cells.chunks(self.size.max(1))
    }

    pub fn house_placed(&self) -> bool {
        self.house_placed
    }

    pub fn house_location(&self) -> Option<GridCoord> {
        self.house_location
    }

    pub fn buildings_placed(&self) -> bool {
        self.buildings_placed
    }

    pub fn building_locations(&self) -> &[BuildingLocation] {
        &self.building_locations
    }

    /// Number of house and building cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }

    pub(crate) fn record_house(&mut self, coord: GridCoord) {
        self.house_placed = true;
        self.house_location = Some(coord);
    }

    pub(crate) fn record_building(&mut self, location: BuildingLocation) {
        self.building_locations.push(location);
    }

    pub(crate) fn mark_buildings_placed(&mut self) {
        self.buildings_placed = true;
    }

    /// Rebuilds a state from persisted parts, checking every grid invariant.
    /// The error string says which one was broken.
    pub(crate) fn restore(
        rows: Vec<Vec<Cell>>,
        house_placed: bool,
        house_location: Option<GridCoord>,
        buildings_placed: bool,
        building_locations: Vec<BuildingLocation>,
    ) -> std::result::Result<Self, String> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    values.len(),
                    size
                ));
            }
            for (col, cell) in values.into_iter().enumerate() {
                let is_road_row = row % 2 == 1;
                if is_road_row != (cell == Cell::Road) {
                    return Err(format!("cell ({}, {}) breaks the road pattern", row, col));
                }
                cells.push(cell);
            }
        }

        let state = Self {
            size,
            cells,
            house_placed,
            house_location,
            buildings_placed,
            building_locations,
        };
        state.check_house()?;
        state.check_buildings()?;
        Ok(state)
    }

    fn check_house(&self) -> std::result::Result<(), String> {
        let house_cells = self.cells.iter().filter(|c| **c == Cell::House).count();
        match (self.house_placed, self.house_location) {
            (true, Some(coord)) => {
                match self.get(coord.row, coord.col) {
                    Ok(Cell::House) => {}
                    _ => {
                        return Err(format!(
                            "house_location ({}, {}) does not hold the house",
                            coord.row, coord.col
                        ))
                    }
                }
                if house_cells != 1 {
                    return Err(format!("expected 1 house cell, found {}", house_cells));
                }
            }
            (false, None) => {
                if house_cells != 0 {
                    return Err("house cell present but house_placed is false".to_string());
                }
            }
            (true, None) => return Err("house_placed is true without a location".to_string()),
            (false, Some(_)) => {
                return Err("house_location set but house_placed is false".to_string())
            }
        }
        Ok(())
    }

    fn check_buildings(&self) -> std::result::Result<(), String> {
        let mut seen = HashSet::new();
        for location in &self.building_locations {
            match self.get(location.row, location.col) {
                Ok(Cell::Building(building_type)) if *building_type == location.building_type => {}
                _ => {
                    return Err(format!(
                        "building '{}' at ({}, {}) does not match the grid",
                        location.building_type, location.row, location.col
                    ))
                }
            }
            if !seen.insert(location.coord()) {
                return Err(format!(
                    "two buildings recorded at ({}, {})",
                    location.row, location.col
                ));
            }
        }

        let building_cells = self
            .cells
            .iter()
            .filter(|c| matches!(c, Cell::Building(_)))
            .count();
        if building_cells != self.building_locations.len() {
            return Err(format!(
                "{} building cells but {} building_locations",
                building_cells,
                self.building_locations.len()
            ));
        }
        Ok(())
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.size || col >= self.size {
            return Err(MapError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        Ok(row * self.size + col)
    }
}

impl Default for GridState {
    fn default() -> Self {
        Self::new(DEFAULT_MAP_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn building(marker: &str) -> BuildingType {
        BuildingType::from_marker(marker).unwrap()
    }

    #[test]
    fn test_new_stamps_roads_on_odd_rows() {
        let state = GridState::new(6);
        for (coord, cell) in state.iter() {
            if coord.row % 2 == 1 {
                assert_eq!(*cell, Cell::Road);
            } else {
                assert_eq!(*cell, Cell::Empty);
            }
        }
        assert!(!state.house_placed());
        assert!(state.building_locations().is_empty());
    }

    #[test]
    fn test_blank_has_no_roads() {
        let state = GridState::blank(4);
        assert!(state.iter().all(|(_, c)| c.is_empty()));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut state = GridState::new(4);
        assert!(matches!(
            state.get(4, 0),
            Err(MapError::OutOfBounds { row: 4, col: 0, size: 4 })
        ));
        assert!(matches!(
            state.set_cell(0, 9, Cell::House),
            Err(MapError::OutOfBounds { .. })
        ));
        assert!(state.is_empty(3, 4).is_err());
    }

    #[test]
    fn test_set_cell_fills_empty_cell() {
        let mut state = GridState::new(4);
        state.set_cell(0, 0, Cell::Building(building("M"))).unwrap();
        assert!(!state.is_empty(0, 0).unwrap());
        assert_eq!(state.occupied_count(), 1);
    }

    #[test]
    fn test_set_cell_rejects_road_target() {
        let mut state = GridState::new(4);
        let before = state.clone();
        assert!(matches!(
            state.set_cell(1, 0, Cell::Building(building("M"))),
            Err(MapError::CellNotWritable { row: 1, col: 0, .. })
        ));
        assert!(matches!(
            state.set_cell(1, 0, Cell::Empty),
            Err(MapError::CellNotWritable { .. })
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn test_set_cell_never_clears_or_overwrites() {
        let mut state = GridState::new(4);
        state.set_cell(0, 0, Cell::Building(building("M"))).unwrap();
        let before = state.clone();

        for cell in [Cell::Empty, Cell::Road, Cell::House, Cell::Building(building("W"))] {
            assert!(matches!(
                state.set_cell(0, 0, cell),
                Err(MapError::CellNotWritable { .. })
            ));
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_set_cell_rejects_road_on_empty_cell() {
        let mut state = GridState::new(4);
        assert!(matches!(
            state.set_cell(0, 0, Cell::Road),
            Err(MapError::CellNotWritable { .. })
        ));
        assert!(state.is_empty(0, 0).unwrap());
    }

    #[test]
    fn test_marker_round_trip_for_unknown_type() {
        let cell = Cell::Building(building("XY"));
        assert_eq!(Cell::from_marker(cell.marker()), Some(cell));
        assert_eq!(Cell::from_marker(""), None);
    }

    #[test]
    fn test_rows_are_square() {
        let state = GridState::new(5);
        let rows: Vec<_> = state.rows().collect();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.len() == 5));
    }

    #[test]
    fn test_restore_rejects_broken_road_pattern() {
        let mut rows: Vec<Vec<Cell>> = GridState::new(4).rows().map(|r| r.to_vec()).collect();
        rows[1][2] = Cell::Empty;
        let err = GridState::restore(rows, false, None, false, Vec::new()).unwrap_err();
        assert!(err.contains("road pattern"));
    }

    #[test]
    fn test_restore_rejects_mismatched_building() {
        let mut rows: Vec<Vec<Cell>> = GridState::new(4).rows().map(|r| r.to_vec()).collect();
        rows[0][0] = Cell::Building(building("M"));
        let locations = vec![BuildingLocation {
            row: 0,
            col: 0,
            building_type: building("W"),
        }];
        assert!(GridState::restore(rows, false, None, true, locations).is_err());
    }

    #[test]
    fn test_restore_rejects_house_flag_without_cell() {
        let rows: Vec<Vec<Cell>> = GridState::new(4).rows().map(|r| r.to_vec()).collect();
        let err = GridState::restore(rows, true, Some(GridCoord::new(2, 2)), false, Vec::new())
            .unwrap_err();
        assert!(err.contains("house"));
    }
}
