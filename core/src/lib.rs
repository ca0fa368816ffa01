pub mod config;
pub mod error;
pub mod identity;
pub mod model;
pub mod repository;
pub mod service;
pub mod usecase;

pub use config::{MapConfig, CONFIG_FILE_NAME};
pub use error::{MapError, Result};
pub use identity::{EnvIdentity, IdentityProvider, StaticIdentity, UserId, DEFAULT_USER_ENV_VAR};
pub use model::{BuildingLocation, BuildingType, Cell, GridCoord, GridState, SpendingEntry};
pub use repository::{
    FileGridStateRepository, FileSpendingRepository, GridStateRepository, LoadOutcome,
    SpendingFileLocator, SpendingRepository, StateSource,
};
pub use service::{aggregate, available_spots, plan, PlacementEngine, PlacementReport};
pub use usecase::{
    build_user_map, generate_layout, generate_layout_with_rng, read_user_spending,
    render_map, AnnotationIndex, CellAnnotation, CellVisit, MapLayout, MapRenderer, MapService,
    UserMap,
};
