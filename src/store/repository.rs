use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument};

use super::models::StoreGamificationSettings;
use crate::shared::AppError;

/// Read-only port for per-store gamification settings
#[async_trait]
pub trait StoreSettingsReader: Send + Sync {
    /// Returns the store's settings, or None if the store never
    /// configured gamification
    async fn get_settings(
        &self,
        store_id: i64,
    ) -> Result<Option<StoreGamificationSettings>, AppError>;
}

/// In-memory implementation of StoreSettingsReader for development and testing
pub struct InMemoryStoreSettings {
    settings: Mutex<HashMap<i64, StoreGamificationSettings>>,
}

impl Default for InMemoryStoreSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStoreSettings {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            settings: Mutex::new(HashMap::new()),
        }
    }

    /// Sets a store's settings
    pub fn insert(&self, settings: StoreGamificationSettings) {
        self.settings
            .lock()
            .unwrap()
            .insert(settings.store_id, settings);
    }
}

#[async_trait]
impl StoreSettingsReader for InMemoryStoreSettings {
    #[instrument(skip(self))]
    async fn get_settings(
        &self,
        store_id: i64,
    ) -> Result<Option<StoreGamificationSettings>, AppError> {
        let settings = self.settings.lock().unwrap();
        let found = settings.get(&store_id).cloned();

        debug!(store_id, found = found.is_some(), "Store settings fetched");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_none_for_unconfigured_store() {
        let repo = InMemoryStoreSettings::new();
        assert!(repo.get_settings(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn returns_inserted_settings() {
        let repo = InMemoryStoreSettings::new();
        repo.insert(StoreGamificationSettings::defaults(1));

        let found = repo.get_settings(1).await.unwrap().unwrap();
        assert_eq!(found.store_id, 1);
        assert!(found.enabled);
    }
}
