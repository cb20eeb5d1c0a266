use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use tracing::{debug, instrument};

use super::models::{Badge, NewBadge};
use crate::shared::AppError;

/// Trait for badge catalog operations.
///
/// The catalog is administered outside the scoring engine; the engine
/// only ever reads the active set.
#[async_trait]
pub trait BadgeCatalog: Send + Sync {
    /// Returns all badges currently flagged active
    async fn list_active_badges(&self) -> Result<Vec<Badge>, AppError>;

    /// Adds a badge definition to the catalog
    async fn create_badge(&self, badge: NewBadge) -> Result<Badge, AppError>;
}

/// In-memory implementation of BadgeCatalog for development and testing
pub struct InMemoryBadgeCatalog {
    badges: Mutex<Vec<Badge>>,
    next_id: Mutex<i64>,
}

impl Default for InMemoryBadgeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBadgeCatalog {
    /// Creates a new empty in-memory catalog
    pub fn new() -> Self {
        Self {
            badges: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
        }
    }

    /// Creates an in-memory catalog with pre-populated badges
    pub fn with_badges(badges: Vec<Badge>) -> Self {
        let next_id = badges.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        Self {
            badges: Mutex::new(badges),
            next_id: Mutex::new(next_id),
        }
    }
}

#[async_trait]
impl BadgeCatalog for InMemoryBadgeCatalog {
    #[instrument(skip(self))]
    async fn list_active_badges(&self) -> Result<Vec<Badge>, AppError> {
        let badges = self.badges.lock().unwrap();
        let active: Vec<Badge> = badges.iter().filter(|b| b.is_active).cloned().collect();

        debug!(active_count = active.len(), "Active badges listed");
        Ok(active)
    }

    #[instrument(skip(self, badge))]
    async fn create_badge(&self, badge: NewBadge) -> Result<Badge, AppError> {
        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;

        let created = Badge {
            id,
            name: badge.name,
            description: badge.description,
            icon: badge.icon,
            badge_type: badge.badge_type,
            requirement: badge.requirement,
            color: badge.color,
            is_active: true,
            created_at: Utc::now(),
        };

        self.badges.lock().unwrap().push(created.clone());

        debug!(badge_id = id, badge_name = %created.name, "Badge created in memory");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::models::BadgeType;

    fn new_badge(name: &str, badge_type: BadgeType, requirement: i64) -> NewBadge {
        NewBadge {
            name: name.to_string(),
            description: format!("{} badge", name),
            icon: "🏅".to_string(),
            badge_type,
            requirement,
            color: "#3B82F6".to_string(),
        }
    }

    #[tokio::test]
    async fn created_badges_are_active_and_listed() {
        let catalog = InMemoryBadgeCatalog::new();

        let created = catalog
            .create_badge(new_badge("First Sale", BadgeType::Sales, 1))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert!(created.is_active);

        let active = catalog.list_active_badges().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "First Sale");
    }

    #[tokio::test]
    async fn inactive_badges_are_not_listed() {
        let catalog = InMemoryBadgeCatalog::new();
        let created = catalog
            .create_badge(new_badge("Retired", BadgeType::Sales, 5))
            .await
            .unwrap();

        let retired = Badge {
            is_active: false,
            ..created
        };
        let catalog = InMemoryBadgeCatalog::with_badges(vec![retired]);

        let active = catalog.list_active_badges().await.unwrap();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let catalog = InMemoryBadgeCatalog::new();

        let first = catalog
            .create_badge(new_badge("A", BadgeType::Sales, 1))
            .await
            .unwrap();
        let second = catalog
            .create_badge(new_badge("B", BadgeType::Milestone, 100_000))
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }
}
