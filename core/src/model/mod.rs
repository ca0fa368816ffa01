pub mod category;
pub mod grid;
pub mod spending;

pub use category::BuildingType;
pub use grid::{BuildingLocation, Cell, GridCoord, GridState, DEFAULT_MAP_SIZE};
pub use spending::{BuildingCount, CategoryTotals, SpendingEntry};
