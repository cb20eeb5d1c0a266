// The gamification scoring engine: badge unlocking, score aggregation
// and leaderboard building over the storage ports.

// Public API - what other modules can use
pub use aggregator::ScoreAggregator;
pub use evaluator::BadgeEvaluator;
pub use handlers::{
    create_badge, get_leaderboard, list_achievements, list_badges, recompute_score,
};
pub use leaderboard::LeaderboardBuilder;
pub use service::{GamificationService, SaleOutcome, StoreEventSubscriber};

pub mod aggregator;
pub mod evaluator;
mod handlers;
pub mod leaderboard;
pub mod points;
pub mod service;
