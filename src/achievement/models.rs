use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A concrete badge unlock for a seller.
///
/// Unlocks are monotonic: at most one record exists per
/// (store_id, seller_id, badge_id) and records are never revoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub store_id: i64,
    pub seller_id: i64,
    pub badge_id: i64,
    pub unlocked_at: DateTime<Utc>,
    /// Flipped by the notification dispatcher once the seller was told
    pub notified: bool,
}

/// Insert shape for a new unlock record
#[derive(Debug, Clone)]
pub struct NewAchievement {
    pub store_id: i64,
    pub seller_id: i64,
    pub badge_id: i64,
    pub unlocked_at: DateTime<Utc>,
}
