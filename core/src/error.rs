use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::category::BuildingType;

pub type Result<T> = std::result::Result<T, MapError>;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("no current user could be determined")]
    MissingUserContext,

    #[error("no spending file found for user '{user}' (searched: {})", join_paths(searched))]
    SpendingFileNotFound { user: String, searched: Vec<PathBuf> },

    #[error("invalid spending data in {origin}: {reason}")]
    SpendingParseError { origin: String, reason: String },

    #[error("no spending entries to aggregate")]
    EmptyInput,

    #[error("total spending is {total}, nothing to allocate")]
    ZeroTotalSpending { total: f64 },

    #[error("house site ({row}, {col}) is already occupied")]
    HouseSiteOccupied { row: usize, col: usize },

    /// Recoverable. The pipeline records it per category instead of aborting.
    #[error("no empty cell found for building '{building_type}' after {attempts} attempts")]
    PlacementExhausted {
        building_type: BuildingType,
        attempts: u32,
    },

    #[error("map state at {} is corrupt: {reason}", path.display())]
    PersistedStateCorrupt { path: PathBuf, reason: String },

    #[error("unable to read map state from {}: {source}", path.display())]
    PersistenceReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cell ({row}, {col}) cannot be written: {reason}")]
    CellNotWritable {
        row: usize,
        col: usize,
        reason: &'static str,
    },

    #[error("unable to write map state to {}: {source}", path.display())]
    PersistenceWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cell ({row}, {col}) is outside the {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
