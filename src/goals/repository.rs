use async_trait::async_trait;
use std::sync::Mutex;
use tracing::{debug, instrument};

use super::models::GoalRecord;
use crate::shared::AppError;

/// Read-only port into the goals subsystem
#[async_trait]
pub trait GoalsReader: Send + Sync {
    /// Lists a seller's goals for one (month, year) period
    async fn list_goals(
        &self,
        store_id: i64,
        seller_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<GoalRecord>, AppError>;
}

/// In-memory implementation of GoalsReader for development and testing
pub struct InMemoryGoalsRepository {
    goals: Mutex<Vec<GoalRecord>>,
}

impl Default for InMemoryGoalsRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGoalsRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            goals: Mutex::new(Vec::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated goals
    pub fn with_goals(goals: Vec<GoalRecord>) -> Self {
        Self {
            goals: Mutex::new(goals),
        }
    }

    /// Adds a goal (the real writer lives in the goals subsystem)
    pub fn add_goal(&self, goal: GoalRecord) {
        self.goals.lock().unwrap().push(goal);
    }
}

#[async_trait]
impl GoalsReader for InMemoryGoalsRepository {
    #[instrument(skip(self))]
    async fn list_goals(
        &self,
        store_id: i64,
        seller_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<GoalRecord>, AppError> {
        let goals = self.goals.lock().unwrap();
        let found: Vec<GoalRecord> = goals
            .iter()
            .filter(|g| {
                g.store_id == store_id
                    && g.seller_id == seller_id
                    && g.month == month
                    && g.year == year
            })
            .cloned()
            .collect();

        debug!(store_id, seller_id, month, year, count = found.len(), "Goals listed");
        Ok(found)
    }
}
