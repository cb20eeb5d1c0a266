// Public API - what other modules can use
pub use models::GoalRecord;
pub use repository::{GoalsReader, InMemoryGoalsRepository};

pub mod models;
pub mod repository;
