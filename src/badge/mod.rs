// Public API - what other modules can use
pub use models::{Badge, BadgeType, NewBadge};
pub use repository::{BadgeCatalog, InMemoryBadgeCatalog};

pub mod models;
pub mod repository;
