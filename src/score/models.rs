use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A seller's aggregated score for one (month, year) period.
///
/// Exactly one row exists per (store_id, seller_id, month, year).
/// All derived fields are recomputed from scratch on every aggregation;
/// `ranking` is populated only after a leaderboard build for the period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerScore {
    pub id: i64,
    pub store_id: i64,
    pub seller_id: i64,
    pub month: u32,
    pub year: i32,
    /// Summed sale value in cents
    pub total_sales: i64,
    pub sales_count: i64,
    pub goals_achieved: i64,
    pub streak_days: i64,
    pub points: i64,
    pub level: i64,
    pub badges_count: i64,
    pub ranking: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived fields produced by one aggregation run, keyed by period.
/// The repository turns this into an insert or an in-place update.
#[derive(Debug, Clone)]
pub struct ScoreDraft {
    pub store_id: i64,
    pub seller_id: i64,
    pub month: u32,
    pub year: i32,
    pub total_sales: i64,
    pub sales_count: i64,
    pub goals_achieved: i64,
    pub points: i64,
    pub level: i64,
    pub badges_count: i64,
}

/// Gamification points: 10 per sale, 100 per achieved goal, 50 per badge
pub fn points_for(sales_count: i64, goals_achieved: i64, badges_count: i64) -> i64 {
    sales_count * 10 + goals_achieved * 100 + badges_count * 50
}

/// Level grows every 1000 points and is never below 1
pub fn level_for(points: i64) -> i64 {
    points / 1000 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn points_formula() {
        assert_eq!(points_for(3, 2, 1), 280);
        assert_eq!(points_for(0, 0, 0), 0);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(999, 1)]
    #[case(1000, 2)]
    #[case(1999, 2)]
    #[case(2000, 3)]
    fn level_boundaries(#[case] points: i64, #[case] expected_level: i64) {
        assert_eq!(level_for(points), expected_level);
    }
}
