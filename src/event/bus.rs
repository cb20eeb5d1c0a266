use tokio::sync::broadcast;
use tracing::debug;

use super::events::StoreEvent;

/// Event bus for distributing store events throughout the application.
///
/// A single broadcast channel is enough here: events carry their own
/// `store_id` and subscribers filter on it if they need to.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emits an event to all subscribers
    pub fn emit(&self, event: StoreEvent) {
        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(receivers = receiver_count, "Store event emitted");
            }
            Err(_) => {
                debug!("Store event emitted with no receivers");
            }
        }
    }

    /// Subscribe to all store events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }
}
