use spendcity_core::{
    render_map, AnnotationIndex, CellAnnotation, CellVisit, GridState, MapRenderer,
};

/// Draws the map as text, one character column per cell. Markers longer than
/// one character are shown as `?` and listed in a legend below the grid.
pub struct TextMapRenderer {
    canvas: Vec<Vec<String>>,
    long_markers: Vec<String>,
}

impl TextMapRenderer {
    pub fn new(state: &GridState) -> Self {
        let canvas = state
            .rows()
            .enumerate()
            .map(|(row, cells)| {
                let fill = if row % 2 == 1 { "=" } else { "." };
                vec![fill.to_string(); cells.len()]
            })
            .collect();
        Self {
            canvas,
            long_markers: Vec::new(),
        }
    }

    pub fn draw(state: &GridState) -> String {
        let mut renderer = Self::new(state);
        render_map(state, None, &mut renderer);
        renderer.finish()
    }

    fn finish(self) -> String {
        let mut out = String::new();
        for row in &self.canvas {
            out.push_str(&row.join(" "));
            out.push('\n');
        }
        if !self.long_markers.is_empty() {
            out.push_str(&format!("? = {}\n", self.long_markers.join(", ")));
        }
        out
    }
}

impl MapRenderer for TextMapRenderer {
    fn visit(&mut self, cell: &CellVisit<'_>) {
        let glyph = if cell.marker.chars().count() == 1 {
            cell.marker.to_string()
        } else {
            if !self.long_markers.iter().any(|m| m == cell.marker) {
                self.long_markers.push(cell.marker.to_string());
            }
            "?".to_string()
        };
        self.canvas[cell.coord.row][cell.coord.col] = glyph;
    }
}

/// Captures the visit for a single coordinate.
pub struct CellInspector {
    row: usize,
    col: usize,
    found: Option<(String, Option<CellAnnotation>)>,
}

impl CellInspector {
    pub fn inspect(
        state: &GridState,
        annotations: Option<&AnnotationIndex>,
        row: usize,
        col: usize,
    ) -> Option<(String, Option<CellAnnotation>)> {
        let mut inspector = Self {
            row,
            col,
            found: None,
        };
        render_map(state, annotations, &mut inspector);
        inspector.found
    }
}

impl MapRenderer for CellInspector {
    fn visit(&mut self, cell: &CellVisit<'_>) {
        if cell.coord.row == self.row && cell.coord.col == self.col {
            self.found = Some((cell.marker.to_string(), cell.annotation.cloned()));
        }
    }
}
