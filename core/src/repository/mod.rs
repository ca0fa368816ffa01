mod atomic;
pub mod file;
pub mod locator;
pub mod spending;
pub mod state;
pub mod traits;

// Re-export
pub use file::{FileGridStateRepository, DEFAULT_STATE_FILE_NAME};
pub use locator::SpendingFileLocator;
pub use spending::FileSpendingRepository;
pub use state::{LoadOutcome, StateSource};
pub use traits::{GridStateRepository, SpendingRepository};
