// Public API - what other modules can use
pub use models::{Achievement, NewAchievement};
pub use repository::{AchievementLedger, InMemoryAchievementLedger, PostgresAchievementLedger};

pub mod models;
pub mod repository;
