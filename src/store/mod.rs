// Public API - what other modules can use
pub use models::{AggregatedPointsMode, GamificationStatus, StoreGamificationSettings};
pub use repository::{InMemoryStoreSettings, StoreSettingsReader};

pub mod models;
pub mod repository;
