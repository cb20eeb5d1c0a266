use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded sale, owned by the sales subsystem and read-only here.
///
/// Monetary values are integer cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: i64,
    pub store_id: i64,
    pub seller_id: i64,
    pub sale_price: i64,
    /// Number of attach-rate items sold alongside the device
    pub additional_items_count: i64,
    /// Total value of the attached items, in cents
    pub additional_items_value: i64,
    pub created_at: DateTime<Utc>,
}
