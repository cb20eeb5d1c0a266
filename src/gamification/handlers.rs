use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

use super::service::GamificationService;
use crate::achievement::Achievement;
use crate::badge::models::{Badge, NewBadge};
use crate::score::SellerScore;
use crate::shared::{AppError, AppState};

fn service(state: &AppState) -> GamificationService {
    GamificationService::new(
        Arc::clone(&state.badge_catalog),
        Arc::clone(&state.achievement_ledger),
        Arc::clone(&state.score_repository),
        Arc::clone(&state.sales_reader),
        Arc::clone(&state.goals_reader),
        Arc::clone(&state.store_settings),
    )
}

/// HTTP handler for listing active badges
///
/// GET /badges
#[instrument(name = "list_badges", skip(state))]
pub async fn list_badges(State(state): State<AppState>) -> Result<Json<Vec<Badge>>, AppError> {
    let badges = state.badge_catalog.list_active_badges().await?;
    Ok(Json(badges))
}

/// HTTP handler for adding a badge definition
///
/// POST /badges
#[instrument(name = "create_badge", skip(state, request))]
pub async fn create_badge(
    State(state): State<AppState>,
    Json(request): Json<NewBadge>,
) -> Result<Json<Badge>, AppError> {
    let badge = state.badge_catalog.create_badge(request).await?;

    info!(badge_id = badge.id, badge_name = %badge.name, "Badge created");
    Ok(Json(badge))
}

/// HTTP handler for a seller's unlock history, newest first
///
/// GET /stores/:store_id/sellers/:seller_id/achievements
#[instrument(name = "list_achievements", skip(state))]
pub async fn list_achievements(
    State(state): State<AppState>,
    Path((store_id, seller_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<Achievement>>, AppError> {
    let achievements = state
        .achievement_ledger
        .list_achievements(store_id, seller_id)
        .await?;
    Ok(Json(achievements))
}

/// HTTP handler for building and returning a period leaderboard
///
/// GET /stores/:store_id/leaderboard/:year/:month
#[instrument(name = "get_leaderboard", skip(state))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path((store_id, year, month)): Path<(i64, i32, u32)>,
) -> Result<Json<Vec<SellerScore>>, AppError> {
    let board = service(&state).leaderboard(store_id, month, year).await?;

    info!(store_id, month, year, entries = board.len(), "Leaderboard served");
    Ok(Json(board))
}

/// HTTP handler for re-running the full pipeline for one seller:
/// badge evaluation followed by a score recomputation.
///
/// POST /stores/:store_id/sellers/:seller_id/scores/:year/:month/recompute
#[instrument(name = "recompute_score", skip(state))]
pub async fn recompute_score(
    State(state): State<AppState>,
    Path((store_id, seller_id, year, month)): Path<(i64, i64, i32, u32)>,
) -> Result<Json<SellerScore>, AppError> {
    let service = service(&state);
    service
        .evaluate_badges(store_id, seller_id, Utc::now())
        .await?;
    let score = service
        .recompute_score(store_id, seller_id, month, year)
        .await?;

    info!(
        store_id,
        seller_id,
        points = score.points,
        level = score.level,
        "Score recomputed on demand"
    );
    Ok(Json(score))
}
