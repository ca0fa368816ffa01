pub mod generate_map;
pub mod render;


pub use generate_map::{
    build_user_map, generate_layout, generate_layout_with_rng, read_user_spending, MapLayout,
    MapService, UserMap,
};
pub use render::{render_map, AnnotationIndex, CellAnnotation, CellVisit, MapRenderer};
