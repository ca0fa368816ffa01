use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{MapError, Result};
use crate::model::grid::GridState;
use crate::repository::atomic::atomic_write;
use crate::repository::state::{LoadOutcome, PersistedMap, StateSource};
use crate::repository::traits::GridStateRepository;

pub const DEFAULT_STATE_FILE_NAME: &str = "map_state.json";

/// Keeps the map in a single JSON file.
#[derive(Clone, Debug)]
pub struct FileGridStateRepository {
    file_path: PathBuf,
    map_size: usize,
}

impl FileGridStateRepository {
    pub fn new(file_path: impl Into<PathBuf>, map_size: usize) -> Self {
        Self {
            file_path: file_path.into(),
            map_size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn corrupt(&self, reason: impl Into<String>) -> MapError {
        MapError::PersistedStateCorrupt {
            path: self.file_path.clone(),
            reason: reason.into(),
        }
    }

    fn fresh(&self, source: StateSource) -> LoadOutcome {
        LoadOutcome::new(GridState::new(self.map_size), source)
    }
}

impl GridStateRepository for FileGridStateRepository {
    fn load(&self) -> Result<LoadOutcome> {
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.file_path.display(), "no saved map, starting a new one");
                return Ok(self.fresh(StateSource::Missing));
            }
            Err(source) => {
                return Err(MapError::PersistenceReadFailure {
                    path: self.file_path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            warn!(path = %self.file_path.display(), "saved map is empty, starting a new one");
            return Ok(self.fresh(StateSource::Empty));
        }

        let persisted: PersistedMap =
            serde_json::from_str(&content).map_err(|e| self.corrupt(e.to_string()))?;

        match persisted.into_state(self.map_size) {
            Ok(Some(state)) => {
                debug!(
                    path = %self.file_path.display(),
                    buildings = state.building_locations().len(),
                    "loaded saved map"
                );
                Ok(LoadOutcome::new(state, StateSource::Persisted))
            }
            Ok(None) => {
                warn!(path = %self.file_path.display(), "saved map has no map data, starting a new one");
                Ok(self.fresh(StateSource::Degenerate))
            }
            Err(reason) => Err(self.corrupt(reason)),
        }
    }

    fn save(&self, state: &GridState) -> Result<()> {
        let write_failure = |source| MapError::PersistenceWriteFailure {
            path: self.file_path.clone(),
            source,
        };

        let data = serde_json::to_vec_pretty(&PersistedMap::from_state(state))
            .map_err(|e| write_failure(e.into()))?;
        atomic_write(&self.file_path, &data).map_err(write_failure)?;

        info!(
            path = %self.file_path.display(),
            buildings = state.building_locations().len(),
            "saved map"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::category::BuildingType;
    use crate::service::placement::PlacementEngine;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tempfile::TempDir;

    fn repo(dir: &TempDir) -> FileGridStateRepository {
        FileGridStateRepository::new(dir.path().join(DEFAULT_STATE_FILE_NAME), 20)
    }

    fn populated_state() -> GridState {
        let mut engine = PlacementEngine::new(ChaCha8Rng::seed_from_u64(5), 1000);
        let mut state = GridState::new(20);
        engine.place_house(&mut state).unwrap();
        for code in ["EO", "OS", "XY", "EO", "GR"] {
            let building = BuildingType::from_category(code).unwrap();
            engine.add_building(&mut state, &building).unwrap();
        }
        state
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let state = populated_state();

        repo.save(&state).unwrap();
        let loaded = repo.load().unwrap();

        assert_eq!(loaded.source, StateSource::Persisted);
        assert_eq!(loaded.state, state);
        assert_eq!(loaded.state.building_locations(), state.building_locations());
    }

    #[test]
    fn test_missing_and_empty_give_same_default() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        let missing = repo.load().unwrap();
        assert_eq!(missing.source, StateSource::Missing);

        fs::write(repo.path(), "  \n\t ").unwrap();
        let empty = repo.load().unwrap();
        assert_eq!(empty.source, StateSource::Empty);

        assert_eq!(missing.state, empty.state);
        assert_eq!(missing.state, GridState::new(20));
        assert!(!empty.state.house_placed());
        assert!(empty.state.building_locations().is_empty());
    }

    #[test]
    fn test_degenerate_map_data_falls_back() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        fs::write(repo.path(), r#"{"map_data": [], "house_placed": false}"#).unwrap();

        let outcome = repo.load().unwrap();
        assert_eq!(outcome.source, StateSource::Degenerate);
        assert_eq!(outcome.state, GridState::new(20));
    }

    #[test]
    fn test_malformed_json_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        fs::write(repo.path(), "{ not json").unwrap();

        assert!(matches!(
            repo.load(),
            Err(MapError::PersistedStateCorrupt { .. })
        ));
    }

    #[test]
    fn test_inconsistent_state_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let state = populated_state();
        repo.save(&state).unwrap();

        // drop the recorded locations but keep the building cells
        let mut value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(repo.path()).unwrap()).unwrap();
        value["building_locations"] = serde_json::json!([]);
        fs::write(repo.path(), value.to_string()).unwrap();

        assert!(matches!(
            repo.load(),
            Err(MapError::PersistedStateCorrupt { .. })
        ));
    }

    #[test]
    fn test_unreadable_file_is_not_corrupt() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        fs::create_dir(repo.path()).unwrap();

        assert!(matches!(
            repo.load(),
            Err(MapError::PersistenceReadFailure { .. })
        ));
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // the target path is a directory, so the final rename fails
        let target = dir.path().join("blocked");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();
        let repo = FileGridStateRepository::new(&target, 20);

        assert!(matches!(
            repo.save(&GridState::new(20)),
            Err(MapError::PersistenceWriteFailure { .. })
        ));
    }
}
