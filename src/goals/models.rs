use serde::{Deserialize, Serialize};

/// A seller goal for one period, owned by the goals subsystem and
/// read-only here. Values are cents for currency goals and plain counts
/// for unit goals; the scoring engine only compares them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalRecord {
    pub id: i64,
    pub store_id: i64,
    pub seller_id: i64,
    pub target_value: i64,
    pub current_value: i64,
    pub month: u32,
    pub year: i32,
}

impl GoalRecord {
    /// A goal counts as achieved once the current value reaches the target
    pub fn is_achieved(&self) -> bool {
        self.current_value >= self.target_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(current_value: i64, target_value: i64) -> GoalRecord {
        GoalRecord {
            id: 1,
            store_id: 1,
            seller_id: 10,
            target_value,
            current_value,
            month: 6,
            year: 2025,
        }
    }

    #[test]
    fn achieved_at_and_above_target() {
        assert!(!goal(99, 100).is_achieved());
        assert!(goal(100, 100).is_achieved());
        assert!(goal(101, 100).is_achieved());
    }
}
