//! Run configuration.
//!
//! Everything the pipeline would otherwise read from the environment lives
//! here and is passed in explicitly. An optional `config.json` in the data
//! directory can override the defaults; any field it leaves out keeps its
//! default value.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MapError, Result};
use crate::model::grid::DEFAULT_MAP_SIZE;
use crate::repository::file::DEFAULT_STATE_FILE_NAME;
use crate::service::placement::DEFAULT_PLACEMENT_ATTEMPTS;

pub const CONFIG_FILE_NAME: &str = "config.json";
const HOME_DIR_NAME: &str = ".spendcity";
const SPENDING_DIR_NAME: &str = "spending";

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub map_size: usize,
    pub placement_attempts: u32,
    /// `None` draws a seed from the OS.
    pub seed: Option<u64>,
    pub data_dir: PathBuf,
    pub state_file: String,
    /// Searched in order for `<user_id>.json`.
    pub spending_dirs: Vec<PathBuf>,
}

/// Optional overrides as written in `config.json`.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    map_size: Option<usize>,
    placement_attempts: Option<u32>,
    seed: Option<u64>,
    state_file: Option<String>,
    spending_dirs: Option<Vec<PathBuf>>,
}

impl MapConfig {
    /// Defaults rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            map_size: DEFAULT_MAP_SIZE,
            placement_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
            seed: None,
            spending_dirs: vec![data_dir.join(SPENDING_DIR_NAME), PathBuf::from(".")],
            state_file: DEFAULT_STATE_FILE_NAME.to_string(),
            data_dir,
        }
    }

    /// `$HOME/.spendcity`
    pub fn default_data_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| MapError::InvalidConfig("could not determine home directory".to_string()))?;
        Ok(home_dir.join(HOME_DIR_NAME))
    }

    /// Loads overrides from `config_path` on top of the defaults for
    /// `data_dir`. A missing file means no overrides. Relative spending
    /// directories in the file are resolved against `data_dir`.
    pub fn load(config_path: &Path, data_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut config = Self::with_data_dir(data_dir);

        let content = match fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %config_path.display(), "no config file, using defaults");
                return config.validated();
            }
            Err(e) => {
                return Err(MapError::InvalidConfig(format!(
                    "unable to read {}: {}",
                    config_path.display(),
                    e
                )))
            }
        };

        let file: ConfigFile = serde_json::from_str(&content).map_err(|e| {
            MapError::InvalidConfig(format!("unable to parse {}: {}", config_path.display(), e))
        })?;

        if let Some(map_size) = file.map_size {
            config.map_size = map_size;
        }
        if let Some(attempts) = file.placement_attempts {
            config.placement_attempts = attempts;
        }
        if file.seed.is_some() {
            config.seed = file.seed;
        }
        if let Some(state_file) = file.state_file {
            config.state_file = state_file;
        }
        if let Some(spending_dirs) = file.spending_dirs {
            config.spending_dirs = spending_dirs.into_iter().map(|d| config.data_dir.join(d)).collect();
        }

        config.validated()
    }

    pub fn validate(&self) -> Result<()> {
        if self.map_size == 0 {
            return Err(MapError::InvalidConfig("map_size must be at least 1".to_string()));
        }
        if self.placement_attempts == 0 {
            return Err(MapError::InvalidConfig(
                "placement_attempts must be at least 1".to_string(),
            ));
        }
        if self.state_file.trim().is_empty() {
            return Err(MapError::InvalidConfig("state_file must not be empty".to_string()));
        }
        Ok(())
    }

    fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(&self.state_file)
    }
}
