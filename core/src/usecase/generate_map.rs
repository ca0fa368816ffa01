use std::path::PathBuf;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::config::MapConfig;
use crate::error::{MapError, Result};
use crate::identity::{IdentityProvider, UserId};
use crate::model::category::BuildingType;
use crate::model::grid::GridState;
use crate::model::spending::{BuildingCount, CategoryTotals, SpendingEntry};
use crate::repository::{
    FileSpendingRepository, GridStateRepository, LoadOutcome, SpendingFileLocator,
    SpendingRepository, StateSource,
};
use crate::service::{aggregate, plan, PlacementEngine, PlacementReport};

/// Everything one pipeline run produced.
#[derive(Debug, Clone)]
pub struct MapLayout {
    pub state: GridState,
    pub totals: CategoryTotals,
    pub counts: BuildingCount,
    pub report: PlacementReport,
    /// Seed used when the layout was generated from config.
    pub seed: Option<u64>,
}

/// Builds a layout from spending entries. Uses `config.seed` when set, else
/// a random seed that is logged so the run can be reproduced.
pub fn generate_layout(entries: &[SpendingEntry], config: &MapConfig) -> Result<MapLayout> {
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, "generating map layout");
    let mut layout = generate_layout_with_rng(entries, config, ChaCha8Rng::seed_from_u64(seed))?;
    layout.seed = Some(seed);
    Ok(layout)
}

pub fn generate_layout_with_rng<R: Rng>(
    entries: &[SpendingEntry],
    config: &MapConfig,
    rng: R,
) -> Result<MapLayout> {
    config.validate()?;
    let totals = aggregate(entries)?;
    let counts = plan(&totals, config.map_size)?;

    // Resolve every marker before the grid is touched.
    let mut requests = Vec::with_capacity(counts.len());
    for (category, count) in &counts {
        requests.push((category.as_str(), BuildingType::from_category(category)?, *count));
    }

    let mut state = GridState::new(config.map_size);
    let mut engine = PlacementEngine::new(rng, config.placement_attempts);
    engine.place_house(&mut state)?;

    let mut report = PlacementReport::new();
    for (category, building_type, count) in &requests {
        report.request(category, building_type, *count);
        for _ in 0..*count {
            match engine.add_building(&mut state, building_type) {
                Ok(_) => report.record_placed(category),
                Err(MapError::PlacementExhausted { .. }) => report.record_failed(category),
                Err(e) => return Err(e),
            }
        }
    }

    if !report.is_complete() {
        warn!(
            requested = report.total_requested(),
            failed = report.total_failed(),
            "some buildings could not be placed"
        );
    }

    Ok(MapLayout {
        state,
        totals,
        counts,
        report,
        seed: None,
    })
}

pub struct MapService<R: GridStateRepository> {
    repo: R,
    config: MapConfig,
}

impl<R: GridStateRepository> MapService<R> {
    pub fn new(repo: R, config: MapConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Runs the pipeline and persists the result. The layout is only returned
    /// once it has been written.
    pub fn generate_and_save(&self, entries: &[SpendingEntry]) -> Result<MapLayout> {
        let layout = generate_layout(entries, &self.config)?;
        self.repo.save(&layout.state)?;
        Ok(layout)
    }

    pub fn generate_and_save_with_rng<G: Rng>(
        &self,
        entries: &[SpendingEntry],
        rng: G,
    ) -> Result<MapLayout> {
        let layout = generate_layout_with_rng(entries, &self.config, rng)?;
        self.repo.save(&layout.state)?;
        Ok(layout)
    }

    /// Loads the saved map. A corrupt file is returned as an error.
    pub fn load(&self) -> Result<LoadOutcome> {
        self.repo.load()
    }

    /// Like `load`, but a corrupt file yields a fresh map marked
    /// `Regenerated`. Nothing is written.
    pub fn load_or_regenerate(&self) -> Result<LoadOutcome> {
        match self.repo.load() {
            Err(MapError::PersistedStateCorrupt { path, reason }) => {
                warn!(path = %path.display(), %reason, "saved map is corrupt, starting a new one");
                Ok(LoadOutcome::new(
                    GridState::new(self.config.map_size),
                    StateSource::Regenerated,
                ))
            }
            other => other,
        }
    }

    /// Overwrites the saved map with a fresh one.
    pub fn reset(&self) -> Result<GridState> {
        let state = GridState::new(self.config.map_size);
        self.repo.save(&state)?;
        Ok(state)
    }
}

#[derive(Debug, Clone)]
pub struct UserMap {
    pub user: UserId,
    pub spending_path: PathBuf,
    pub entries: Vec<SpendingEntry>,
    pub layout: MapLayout,
}

/// Finds and reads the current user's spending file.
pub fn read_user_spending<I: IdentityProvider + ?Sized>(
    identity: &I,
    locator: &SpendingFileLocator,
) -> Result<(UserId, PathBuf, Vec<SpendingEntry>)> {
    let user = identity.current_user()?;
    let path = locator.locate(&user)?;
    let entries = FileSpendingRepository::new(&path).list()?;
    Ok((user, path, entries))
}

/// Identity, spending file, layout, save. Nothing is written unless every
/// step before placement succeeds.
pub fn build_user_map<I, R>(
    identity: &I,
    locator: &SpendingFileLocator,
    service: &MapService<R>,
) -> Result<UserMap>
where
    I: IdentityProvider + ?Sized,
    R: GridStateRepository,
{
    let (user, spending_path, entries) = read_user_spending(identity, locator)?;
    info!(user = %user, path = %spending_path.display(), entries = entries.len(), "building map");
    let layout = service.generate_and_save(&entries)?;
    Ok(UserMap {
        user,
        spending_path,
        entries,
        layout,
    })
}
