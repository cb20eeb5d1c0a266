use std::sync::Arc;
use tracing::{debug, instrument};

use crate::score::repository::ScoreRepository;
use crate::score::SellerScore;
use crate::shared::AppError;

/// Builds the ranked leaderboard projection for one store and period.
pub struct LeaderboardBuilder {
    scores: Arc<dyn ScoreRepository>,
}

impl LeaderboardBuilder {
    pub fn new(scores: Arc<dyn ScoreRepository>) -> Self {
        Self { scores }
    }

    /// Sorts the period's score rows by points descending and persists
    /// dense 1-based ranks back onto every row.
    ///
    /// The sort is stable: equal point totals keep the repository's
    /// insertion order, so ties get consecutive distinct ranks rather
    /// than shared ones. Rank writes are per-row; a failure mid-loop
    /// leaves earlier rows ranked, and the projection is simply rebuilt
    /// on the next call.
    #[instrument(skip(self))]
    pub async fn build(
        &self,
        store_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<SellerScore>, AppError> {
        let mut scores = self.scores.list_scores(store_id, month, year).await?;
        scores.sort_by(|a, b| b.points.cmp(&a.points));

        for (index, score) in scores.iter_mut().enumerate() {
            let ranking = (index + 1) as i64;
            self.scores.set_ranking(score.id, ranking).await?;
            score.ranking = Some(ranking);
        }

        debug!(store_id, month, year, entries = scores.len(), "Leaderboard built");
        Ok(scores)
    }
}
