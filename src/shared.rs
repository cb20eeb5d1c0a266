use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::achievement::repository::AchievementLedger;
use crate::badge::repository::BadgeCatalog;
use crate::event::EventBus;
use crate::goals::repository::GoalsReader;
use crate::sales::repository::SalesReader;
use crate::score::repository::ScoreRepository;
use crate::store::repository::StoreSettingsReader;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub badge_catalog: Arc<dyn BadgeCatalog>,
    pub achievement_ledger: Arc<dyn AchievementLedger>,
    pub score_repository: Arc<dyn ScoreRepository>,
    pub sales_reader: Arc<dyn SalesReader>,
    pub goals_reader: Arc<dyn GoalsReader>,
    pub store_settings: Arc<dyn StoreSettingsReader>,
    pub event_bus: EventBus,
}

impl AppState {
    pub fn new(
        badge_catalog: Arc<dyn BadgeCatalog>,
        achievement_ledger: Arc<dyn AchievementLedger>,
        score_repository: Arc<dyn ScoreRepository>,
        sales_reader: Arc<dyn SalesReader>,
        goals_reader: Arc<dyn GoalsReader>,
        store_settings: Arc<dyn StoreSettingsReader>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            badge_catalog,
            achievement_ledger,
            score_repository,
            sales_reader,
            goals_reader,
            store_settings,
            event_bus,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::achievement::repository::InMemoryAchievementLedger;
    use crate::badge::repository::InMemoryBadgeCatalog;
    use crate::goals::repository::InMemoryGoalsRepository;
    use crate::sales::repository::InMemorySalesRepository;
    use crate::score::repository::InMemoryScoreRepository;
    use crate::store::repository::InMemoryStoreSettings;

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        badge_catalog: Option<Arc<dyn BadgeCatalog>>,
        achievement_ledger: Option<Arc<dyn AchievementLedger>>,
        score_repository: Option<Arc<dyn ScoreRepository>>,
        sales_reader: Option<Arc<dyn SalesReader>>,
        goals_reader: Option<Arc<dyn GoalsReader>>,
        store_settings: Option<Arc<dyn StoreSettingsReader>>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                badge_catalog: None,
                achievement_ledger: None,
                score_repository: None,
                sales_reader: None,
                goals_reader: None,
                store_settings: None,
            }
        }

        pub fn with_badge_catalog(mut self, catalog: Arc<dyn BadgeCatalog>) -> Self {
            self.badge_catalog = Some(catalog);
            self
        }

        pub fn with_achievement_ledger(mut self, ledger: Arc<dyn AchievementLedger>) -> Self {
            self.achievement_ledger = Some(ledger);
            self
        }

        pub fn with_score_repository(mut self, repo: Arc<dyn ScoreRepository>) -> Self {
            self.score_repository = Some(repo);
            self
        }

        pub fn with_sales_reader(mut self, reader: Arc<dyn SalesReader>) -> Self {
            self.sales_reader = Some(reader);
            self
        }

        pub fn with_goals_reader(mut self, reader: Arc<dyn GoalsReader>) -> Self {
            self.goals_reader = Some(reader);
            self
        }

        pub fn with_store_settings(mut self, reader: Arc<dyn StoreSettingsReader>) -> Self {
            self.store_settings = Some(reader);
            self
        }

        pub fn build(self) -> AppState {
            AppState {
                badge_catalog: self
                    .badge_catalog
                    .unwrap_or_else(|| Arc::new(InMemoryBadgeCatalog::new())),
                achievement_ledger: self
                    .achievement_ledger
                    .unwrap_or_else(|| Arc::new(InMemoryAchievementLedger::new())),
                score_repository: self
                    .score_repository
                    .unwrap_or_else(|| Arc::new(InMemoryScoreRepository::new())),
                sales_reader: self
                    .sales_reader
                    .unwrap_or_else(|| Arc::new(InMemorySalesRepository::new())),
                goals_reader: self
                    .goals_reader
                    .unwrap_or_else(|| Arc::new(InMemoryGoalsRepository::new())),
                store_settings: self
                    .store_settings
                    .unwrap_or_else(|| Arc::new(InMemoryStoreSettings::new())),
                event_bus: EventBus::new(100),
            }
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
