pub mod aggregator;
pub mod dto;
pub mod placement;
pub mod planner;

pub use aggregator::aggregate;
pub use dto::{CategoryPlacement, PlacementReport};
pub use placement::{HousePlacement, PlacementEngine, DEFAULT_PLACEMENT_ATTEMPTS};
pub use planner::{available_spots, plan};
