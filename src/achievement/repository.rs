use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{Achievement, NewAchievement};
use crate::shared::AppError;

/// Trait for the append-only achievement ledger.
///
/// The (store_id, seller_id, badge_id) triple is unique. The evaluator
/// only does a read-check-then-write, so the implementation must enforce
/// the uniqueness itself to stay safe under concurrent evaluations.
#[async_trait]
pub trait AchievementLedger: Send + Sync {
    /// Lists a seller's unlocks, newest first
    async fn list_achievements(
        &self,
        store_id: i64,
        seller_id: i64,
    ) -> Result<Vec<Achievement>, AppError>;

    /// Lists all unlocks for a store, newest first
    async fn list_store_achievements(&self, store_id: i64) -> Result<Vec<Achievement>, AppError>;

    /// Appends one unlock record with `notified = false`.
    /// Returns `AppError::Conflict` if the badge is already unlocked
    /// for this seller.
    async fn append_achievement(
        &self,
        achievement: NewAchievement,
    ) -> Result<Achievement, AppError>;
}

/// In-memory implementation of AchievementLedger for development and testing
pub struct InMemoryAchievementLedger {
    achievements: Mutex<Vec<Achievement>>,
    next_id: Mutex<i64>,
}

impl Default for InMemoryAchievementLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAchievementLedger {
    /// Creates a new empty in-memory ledger
    pub fn new() -> Self {
        Self {
            achievements: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
        }
    }

    /// Returns the current number of unlock records (useful for tests)
    pub fn achievement_count(&self) -> usize {
        self.achievements.lock().unwrap().len()
    }
}

#[async_trait]
impl AchievementLedger for InMemoryAchievementLedger {
    #[instrument(skip(self))]
    async fn list_achievements(
        &self,
        store_id: i64,
        seller_id: i64,
    ) -> Result<Vec<Achievement>, AppError> {
        let achievements = self.achievements.lock().unwrap();
        let mut found: Vec<Achievement> = achievements
            .iter()
            .filter(|a| a.store_id == store_id && a.seller_id == seller_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.unlocked_at.cmp(&a.unlocked_at));

        debug!(store_id, seller_id, count = found.len(), "Achievements listed");
        Ok(found)
    }

    #[instrument(skip(self))]
    async fn list_store_achievements(&self, store_id: i64) -> Result<Vec<Achievement>, AppError> {
        let achievements = self.achievements.lock().unwrap();
        let mut found: Vec<Achievement> = achievements
            .iter()
            .filter(|a| a.store_id == store_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.unlocked_at.cmp(&a.unlocked_at));

        debug!(store_id, count = found.len(), "Store achievements listed");
        Ok(found)
    }

    #[instrument(skip(self, achievement))]
    async fn append_achievement(
        &self,
        achievement: NewAchievement,
    ) -> Result<Achievement, AppError> {
        let mut achievements = self.achievements.lock().unwrap();

        let duplicate = achievements.iter().any(|a| {
            a.store_id == achievement.store_id
                && a.seller_id == achievement.seller_id
                && a.badge_id == achievement.badge_id
        });
        if duplicate {
            warn!(
                store_id = achievement.store_id,
                seller_id = achievement.seller_id,
                badge_id = achievement.badge_id,
                "Badge already unlocked for seller"
            );
            return Err(AppError::Conflict("Badge already unlocked".to_string()));
        }

        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;

        let record = Achievement {
            id,
            store_id: achievement.store_id,
            seller_id: achievement.seller_id,
            badge_id: achievement.badge_id,
            unlocked_at: achievement.unlocked_at,
            notified: false,
        };
        achievements.push(record.clone());

        debug!(
            achievement_id = id,
            badge_id = record.badge_id,
            "Achievement appended to ledger"
        );
        Ok(record)
    }
}

/// PostgreSQL implementation of the achievement ledger.
///
/// Relies on a unique index over (store_id, seller_id, badge_id) so that
/// concurrent evaluations cannot double-unlock the same badge.
pub struct PostgresAchievementLedger {
    pool: PgPool,
}

impl PostgresAchievementLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_achievement(row: &sqlx::postgres::PgRow) -> Achievement {
        Achievement {
            id: row.get("id"),
            store_id: row.get("store_id"),
            seller_id: row.get("seller_id"),
            badge_id: row.get("badge_id"),
            unlocked_at: row.get("unlocked_at"),
            notified: row.get("notified"),
        }
    }
}

#[async_trait]
impl AchievementLedger for PostgresAchievementLedger {
    #[instrument(skip(self))]
    async fn list_achievements(
        &self,
        store_id: i64,
        seller_id: i64,
    ) -> Result<Vec<Achievement>, AppError> {
        let rows = sqlx::query(
            "SELECT id, store_id, seller_id, badge_id, unlocked_at, notified \
             FROM seller_achievements WHERE store_id = $1 AND seller_id = $2 \
             ORDER BY unlocked_at DESC",
        )
        .bind(store_id)
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, store_id, seller_id, "Failed to list achievements");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows.iter().map(Self::row_to_achievement).collect())
    }

    #[instrument(skip(self))]
    async fn list_store_achievements(&self, store_id: i64) -> Result<Vec<Achievement>, AppError> {
        let rows = sqlx::query(
            "SELECT id, store_id, seller_id, badge_id, unlocked_at, notified \
             FROM seller_achievements WHERE store_id = $1 \
             ORDER BY unlocked_at DESC",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, store_id, "Failed to list store achievements");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows.iter().map(Self::row_to_achievement).collect())
    }

    #[instrument(skip(self, achievement))]
    async fn append_achievement(
        &self,
        achievement: NewAchievement,
    ) -> Result<Achievement, AppError> {
        let row = sqlx::query(
            "INSERT INTO seller_achievements (store_id, seller_id, badge_id, unlocked_at, notified) \
             VALUES ($1, $2, $3, $4, FALSE) \
             ON CONFLICT (store_id, seller_id, badge_id) DO NOTHING \
             RETURNING id, store_id, seller_id, badge_id, unlocked_at, notified",
        )
        .bind(achievement.store_id)
        .bind(achievement.seller_id)
        .bind(achievement.badge_id)
        .bind(achievement.unlocked_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to append achievement");
            AppError::DatabaseError(e.to_string())
        })?;

        match row {
            Some(row) => Ok(Self::row_to_achievement(&row)),
            None => {
                warn!(
                    store_id = achievement.store_id,
                    seller_id = achievement.seller_id,
                    badge_id = achievement.badge_id,
                    "Badge already unlocked for seller"
                );
                Err(AppError::Conflict("Badge already unlocked".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn unlock(store_id: i64, seller_id: i64, badge_id: i64) -> NewAchievement {
        NewAchievement {
            store_id,
            seller_id,
            badge_id,
            unlocked_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn appends_and_lists_achievements() {
        let ledger = InMemoryAchievementLedger::new();

        let record = ledger.append_achievement(unlock(1, 10, 100)).await.unwrap();
        assert_eq!(record.id, 1);
        assert!(!record.notified);

        let listed = ledger.list_achievements(1, 10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].badge_id, 100);
    }

    #[tokio::test]
    async fn rejects_duplicate_unlock_for_same_triple() {
        let ledger = InMemoryAchievementLedger::new();

        ledger.append_achievement(unlock(1, 10, 100)).await.unwrap();
        let result = ledger.append_achievement(unlock(1, 10, 100)).await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
        assert_eq!(ledger.achievement_count(), 1);
    }

    #[tokio::test]
    async fn same_badge_can_unlock_for_different_sellers() {
        let ledger = InMemoryAchievementLedger::new();

        ledger.append_achievement(unlock(1, 10, 100)).await.unwrap();
        ledger.append_achievement(unlock(1, 11, 100)).await.unwrap();
        ledger.append_achievement(unlock(2, 10, 100)).await.unwrap();

        assert_eq!(ledger.achievement_count(), 3);
        assert_eq!(ledger.list_achievements(1, 10).await.unwrap().len(), 1);
        assert_eq!(ledger.list_store_achievements(1).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn lists_newest_unlocks_first() {
        let ledger = InMemoryAchievementLedger::new();
        let earlier = Utc::now() - Duration::days(2);

        ledger
            .append_achievement(NewAchievement {
                unlocked_at: earlier,
                ..unlock(1, 10, 100)
            })
            .await
            .unwrap();
        ledger.append_achievement(unlock(1, 10, 101)).await.unwrap();

        let listed = ledger.list_achievements(1, 10).await.unwrap();
        assert_eq!(listed[0].badge_id, 101);
        assert_eq!(listed[1].badge_id, 100);
    }
}
