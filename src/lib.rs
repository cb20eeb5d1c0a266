// Library crate for the retail gamification scoring engine
// This file exposes the public API for integration tests

pub mod achievement;
pub mod badge;
pub mod event;
pub mod gamification;
pub mod goals;
pub mod sales;
pub mod score;
pub mod shared;
pub mod store;

// Re-export commonly used types for easier access in tests
pub use achievement::{Achievement, AchievementLedger, InMemoryAchievementLedger};
pub use badge::{Badge, BadgeCatalog, BadgeType, InMemoryBadgeCatalog};
pub use event::{EventBus, StoreEvent, StoreEventHandler};
pub use gamification::{GamificationService, SaleOutcome, StoreEventSubscriber};
pub use sales::{InMemorySalesRepository, SaleRecord};
pub use score::{InMemoryScoreRepository, ScoreRepository, SellerScore};
pub use shared::AppError;
