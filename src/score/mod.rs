// Public API - what other modules can use
pub use models::{level_for, points_for, ScoreDraft, SellerScore};
pub use repository::{InMemoryScoreRepository, PostgresScoreRepository, ScoreRepository};

pub mod models;
pub mod repository;
