use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{ScoreDraft, SellerScore};
use crate::shared::AppError;

/// Trait for the seller score store.
///
/// The upsert must be atomic on (store_id, seller_id, month, year) so
/// concurrent recomputations cannot create duplicate period rows.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    /// Fetches the score row for one seller and period, if present
    async fn get_score(
        &self,
        store_id: i64,
        seller_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Option<SellerScore>, AppError>;

    /// Inserts or updates the period row for the draft's key. New rows
    /// start with `streak_days = 0` and no ranking; updates only touch
    /// the derived fields and `updated_at`.
    async fn upsert_score(&self, draft: ScoreDraft) -> Result<SellerScore, AppError>;

    /// Lists all score rows for a store and period, in insertion order
    async fn list_scores(
        &self,
        store_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<SellerScore>, AppError>;

    /// Persists a leaderboard rank for one score row
    async fn set_ranking(&self, score_id: i64, ranking: i64) -> Result<(), AppError>;
}

/// In-memory implementation of ScoreRepository for development and testing
pub struct InMemoryScoreRepository {
    scores: Mutex<Vec<SellerScore>>,
    next_id: Mutex<i64>,
}

impl Default for InMemoryScoreRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryScoreRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            scores: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
        }
    }

    /// Returns the current number of score rows (useful for tests)
    pub fn score_count(&self) -> usize {
        self.scores.lock().unwrap().len()
    }
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    #[instrument(skip(self))]
    async fn get_score(
        &self,
        store_id: i64,
        seller_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Option<SellerScore>, AppError> {
        let scores = self.scores.lock().unwrap();
        let found = scores
            .iter()
            .find(|s| {
                s.store_id == store_id
                    && s.seller_id == seller_id
                    && s.month == month
                    && s.year == year
            })
            .cloned();

        debug!(store_id, seller_id, month, year, found = found.is_some(), "Score fetched");
        Ok(found)
    }

    #[instrument(skip(self, draft))]
    async fn upsert_score(&self, draft: ScoreDraft) -> Result<SellerScore, AppError> {
        let mut scores = self.scores.lock().unwrap();
        let now = Utc::now();

        if let Some(existing) = scores.iter_mut().find(|s| {
            s.store_id == draft.store_id
                && s.seller_id == draft.seller_id
                && s.month == draft.month
                && s.year == draft.year
        }) {
            existing.total_sales = draft.total_sales;
            existing.sales_count = draft.sales_count;
            existing.goals_achieved = draft.goals_achieved;
            existing.points = draft.points;
            existing.level = draft.level;
            existing.badges_count = draft.badges_count;
            existing.updated_at = now;

            debug!(score_id = existing.id, points = existing.points, "Score updated in memory");
            return Ok(existing.clone());
        }

        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;

        let score = SellerScore {
            id,
            store_id: draft.store_id,
            seller_id: draft.seller_id,
            month: draft.month,
            year: draft.year,
            total_sales: draft.total_sales,
            sales_count: draft.sales_count,
            goals_achieved: draft.goals_achieved,
            streak_days: 0,
            points: draft.points,
            level: draft.level,
            badges_count: draft.badges_count,
            ranking: None,
            created_at: now,
            updated_at: now,
        };
        scores.push(score.clone());

        debug!(score_id = id, points = score.points, "Score inserted in memory");
        Ok(score)
    }

    #[instrument(skip(self))]
    async fn list_scores(
        &self,
        store_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<SellerScore>, AppError> {
        let scores = self.scores.lock().unwrap();
        // Vec order is insertion order, so this is already id-ascending
        let found: Vec<SellerScore> = scores
            .iter()
            .filter(|s| s.store_id == store_id && s.month == month && s.year == year)
            .cloned()
            .collect();

        debug!(store_id, month, year, count = found.len(), "Scores listed");
        Ok(found)
    }

    #[instrument(skip(self))]
    async fn set_ranking(&self, score_id: i64, ranking: i64) -> Result<(), AppError> {
        let mut scores = self.scores.lock().unwrap();
        let score = scores
            .iter_mut()
            .find(|s| s.id == score_id)
            .ok_or_else(|| AppError::NotFound("Score not found".to_string()))?;
        score.ranking = Some(ranking);

        debug!(score_id, ranking, "Ranking persisted");
        Ok(())
    }
}

/// PostgreSQL implementation of the score store.
///
/// Relies on a unique index over (store_id, seller_id, month, year);
/// the upsert is a single `ON CONFLICT ... DO UPDATE` statement.
pub struct PostgresScoreRepository {
    pool: PgPool,
}

impl PostgresScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_score(row: &sqlx::postgres::PgRow) -> SellerScore {
        SellerScore {
            id: row.get("id"),
            store_id: row.get("store_id"),
            seller_id: row.get("seller_id"),
            month: row.get::<i32, _>("month") as u32,
            year: row.get("year"),
            total_sales: row.get("total_sales"),
            sales_count: row.get("sales_count"),
            goals_achieved: row.get("goals_achieved"),
            streak_days: row.get("streak_days"),
            points: row.get("points"),
            level: row.get("level"),
            badges_count: row.get("badges_count"),
            ranking: row.get("ranking"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

const SCORE_COLUMNS: &str = "id, store_id, seller_id, month, year, total_sales, sales_count, \
     goals_achieved, streak_days, points, level, badges_count, ranking, created_at, updated_at";

#[async_trait]
impl ScoreRepository for PostgresScoreRepository {
    #[instrument(skip(self))]
    async fn get_score(
        &self,
        store_id: i64,
        seller_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Option<SellerScore>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {SCORE_COLUMNS} FROM seller_scores \
             WHERE store_id = $1 AND seller_id = $2 AND month = $3 AND year = $4"
        ))
        .bind(store_id)
        .bind(seller_id)
        .bind(month as i32)
        .bind(year)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, store_id, seller_id, "Failed to fetch score");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(row.as_ref().map(Self::row_to_score))
    }

    #[instrument(skip(self, draft))]
    async fn upsert_score(&self, draft: ScoreDraft) -> Result<SellerScore, AppError> {
        let row = sqlx::query(&format!(
            "INSERT INTO seller_scores \
             (store_id, seller_id, month, year, total_sales, sales_count, goals_achieved, \
              streak_days, points, level, badges_count, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8, $9, $10, NOW(), NOW()) \
             ON CONFLICT (store_id, seller_id, month, year) DO UPDATE SET \
              total_sales = EXCLUDED.total_sales, sales_count = EXCLUDED.sales_count, \
              goals_achieved = EXCLUDED.goals_achieved, points = EXCLUDED.points, \
              level = EXCLUDED.level, badges_count = EXCLUDED.badges_count, \
              updated_at = NOW() \
             RETURNING {SCORE_COLUMNS}"
        ))
        .bind(draft.store_id)
        .bind(draft.seller_id)
        .bind(draft.month as i32)
        .bind(draft.year)
        .bind(draft.total_sales)
        .bind(draft.sales_count)
        .bind(draft.goals_achieved)
        .bind(draft.points)
        .bind(draft.level)
        .bind(draft.badges_count)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to upsert score");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(Self::row_to_score(&row))
    }

    #[instrument(skip(self))]
    async fn list_scores(
        &self,
        store_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<SellerScore>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {SCORE_COLUMNS} FROM seller_scores \
             WHERE store_id = $1 AND month = $2 AND year = $3 ORDER BY id ASC"
        ))
        .bind(store_id)
        .bind(month as i32)
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, store_id, "Failed to list scores");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows.iter().map(Self::row_to_score).collect())
    }

    #[instrument(skip(self))]
    async fn set_ranking(&self, score_id: i64, ranking: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE seller_scores SET ranking = $2 WHERE id = $1")
            .bind(score_id)
            .bind(ranking)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, score_id, "Failed to persist ranking");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(score_id, "Score not found for ranking update");
            return Err(AppError::NotFound("Score not found".to_string()));
        }

        Ok(())
    }
}
