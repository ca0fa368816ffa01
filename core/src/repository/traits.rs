use crate::error::Result;
use crate::model::grid::GridState;
use crate::model::spending::SpendingEntry;
use crate::repository::state::LoadOutcome;

pub trait GridStateRepository {
    fn load(&self) -> Result<LoadOutcome>;
    fn save(&self, state: &GridState) -> Result<()>;
}

pub trait SpendingRepository {
    fn list(&self) -> Result<Vec<SpendingEntry>>;
}
