// Event-driven glue between the sales/goals subsystems and the
// gamification engine. Events represent facts that already happened;
// subscribers react to them without coupling the producers to scoring.

// Public API - what other modules can use
pub use bus::EventBus;
pub use events::StoreEvent;
pub use handler::{EventError, StoreEventHandler};

// Internal modules
mod bus;
mod events;
mod handler;
