use serde::{Deserialize, Serialize};

/// Events emitted by the surrounding application after a tenant's data
/// changed in a way the gamification engine cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreEvent {
    /// A sale has been recorded for a seller
    SaleRecorded { store_id: i64, seller_id: i64 },

    /// A goal's current value has been updated
    GoalUpdated {
        store_id: i64,
        seller_id: i64,
        month: u32,
        year: i32,
    },
}

impl StoreEvent {
    /// Get the tenant this event belongs to
    pub fn store_id(&self) -> i64 {
        match self {
            StoreEvent::SaleRecorded { store_id, .. } => *store_id,
            StoreEvent::GoalUpdated { store_id, .. } => *store_id,
        }
    }

    /// Get a human-readable description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            StoreEvent::SaleRecorded { .. } => "sale_recorded",
            StoreEvent::GoalUpdated { .. } => "goal_updated",
        }
    }
}
