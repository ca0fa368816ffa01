use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

pub const EMPTY_MARKER: &str = "0";
pub const ROAD_MARKER: &str = "1";
pub const HOUSE_MARKER: &str = "H";

const RESERVED_MARKERS: [&str; 3] = [EMPTY_MARKER, ROAD_MARKER, HOUSE_MARKER];

// category code -> building marker
const CATEGORY_MARKERS: [(&str, &str); 5] = [
    ("EO", "M"),
    ("OS", "W"),
    ("SH", "F"),
    ("NI", "N"),
    ("GR", "T"),
];

/// Marker stored in a grid cell for a building. Known category codes map to a
/// single letter; any other code is carried through unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct BuildingType(String);

impl BuildingType {
    /// Maps a spending category code to its building marker.
    ///
    /// Fails when the resulting marker is empty or would be read back as an
    /// empty cell, a road or the house.
    pub fn from_category(code: &str) -> Result<Self> {
        let marker = CATEGORY_MARKERS
            .iter()
            .find(|(category, _)| *category == code)
            .map(|(_, marker)| *marker)
            .unwrap_or(code);

        Self::from_marker(marker).ok_or_else(|| MapError::SpendingParseError {
            origin: format!("category '{}'", code),
            reason: "category code collides with a reserved grid marker".to_string(),
        })
    }

    /// Wraps a raw marker, rejecting the reserved ones.
    pub fn from_marker(marker: &str) -> Option<Self> {
        if marker.is_empty() || RESERVED_MARKERS.contains(&marker) {
            return None;
        }
        Some(Self(marker.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// False for codes that were passed through unmapped.
    pub fn is_known(&self) -> bool {
        CATEGORY_MARKERS.iter().any(|(_, marker)| *marker == self.0)
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories_map_to_letters() {
        assert_eq!(BuildingType::from_category("EO").unwrap().as_str(), "M");
        assert_eq!(BuildingType::from_category("OS").unwrap().as_str(), "W");
        assert_eq!(BuildingType::from_category("SH").unwrap().as_str(), "F");
        assert_eq!(BuildingType::from_category("NI").unwrap().as_str(), "N");
        assert_eq!(BuildingType::from_category("GR").unwrap().as_str(), "T");
    }

    #[test]
    fn test_unknown_category_passes_through() {
        let building = BuildingType::from_category("XY").unwrap();
        assert_eq!(building.as_str(), "XY");
        assert!(!building.is_known());
    }

    #[test]
    fn test_reserved_markers_rejected() {
        for code in ["0", "1", "H", ""] {
            assert!(matches!(
                BuildingType::from_category(code),
                Err(MapError::SpendingParseError { .. })
            ));
        }
    }
}
