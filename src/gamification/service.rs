use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::{
    aggregator::ScoreAggregator, evaluator::BadgeEvaluator, leaderboard::LeaderboardBuilder,
    points,
};
use crate::achievement::repository::AchievementLedger;
use crate::achievement::Achievement;
use crate::badge::repository::BadgeCatalog;
use crate::event::{EventError, StoreEvent, StoreEventHandler};
use crate::goals::repository::GoalsReader;
use crate::sales::repository::SalesReader;
use crate::score::repository::ScoreRepository;
use crate::score::SellerScore;
use crate::shared::AppError;
use crate::store::models::{GamificationStatus, StoreGamificationSettings};
use crate::store::repository::StoreSettingsReader;

/// Result of running the full pipeline for one sale or goal event
#[derive(Debug)]
pub enum SaleOutcome {
    /// Evaluation and recomputation ran
    Processed {
        new_achievements: Vec<Achievement>,
        score: SellerScore,
    },
    /// The store's gamification window is not active; nothing ran
    Skipped { status: GamificationStatus },
}

/// Facade over the three engine operations plus the store-level
/// configuration that gates the event-driven entry points.
pub struct GamificationService {
    evaluator: BadgeEvaluator,
    aggregator: ScoreAggregator,
    leaderboard: LeaderboardBuilder,
    settings: Arc<dyn StoreSettingsReader>,
}

impl GamificationService {
    pub fn new(
        badges: Arc<dyn BadgeCatalog>,
        achievements: Arc<dyn AchievementLedger>,
        scores: Arc<dyn ScoreRepository>,
        sales: Arc<dyn SalesReader>,
        goals: Arc<dyn GoalsReader>,
        settings: Arc<dyn StoreSettingsReader>,
    ) -> Self {
        Self {
            evaluator: BadgeEvaluator::new(sales.clone(), achievements.clone(), badges),
            aggregator: ScoreAggregator::new(sales, goals, achievements, scores.clone()),
            leaderboard: LeaderboardBuilder::new(scores),
            settings,
        }
    }

    /// Direct badge evaluation; not gated by the gamification window
    pub async fn evaluate_badges(
        &self,
        store_id: i64,
        seller_id: i64,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<Achievement>, AppError> {
        self.evaluator.evaluate(store_id, seller_id, as_of).await
    }

    /// Direct score recomputation; not gated by the gamification window
    pub async fn recompute_score(
        &self,
        store_id: i64,
        seller_id: i64,
        month: u32,
        year: i32,
    ) -> Result<SellerScore, AppError> {
        self.aggregator
            .recompute(store_id, seller_id, month, year)
            .await
    }

    /// Builds and persists the leaderboard for one store and period
    pub async fn leaderboard(
        &self,
        store_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<SellerScore>, AppError> {
        self.leaderboard.build(store_id, month, year).await
    }

    /// Bonus points for a sale's attach-rate items under the store's
    /// configured mode. Unconfigured stores use the defaults.
    pub async fn aggregated_sale_points(
        &self,
        store_id: i64,
        items_count: i64,
        items_value: i64,
    ) -> Result<i64, AppError> {
        let settings = self.store_settings(store_id).await?;
        Ok(points::aggregated_sale_points(
            &settings,
            items_count,
            items_value,
        ))
    }

    /// Full pipeline for a recorded sale: evaluate badges, then
    /// recompute the score for the sale month. Skipped entirely when
    /// the store's gamification window is not active.
    #[instrument(skip(self))]
    pub async fn process_sale(
        &self,
        store_id: i64,
        seller_id: i64,
        as_of: DateTime<Utc>,
    ) -> Result<SaleOutcome, AppError> {
        self.process_event(store_id, seller_id, as_of.month(), as_of.year(), as_of)
            .await
    }

    /// Full pipeline for a goal update, recomputing the goal's own period
    #[instrument(skip(self))]
    pub async fn process_goal_update(
        &self,
        store_id: i64,
        seller_id: i64,
        month: u32,
        year: i32,
        as_of: DateTime<Utc>,
    ) -> Result<SaleOutcome, AppError> {
        self.process_event(store_id, seller_id, month, year, as_of)
            .await
    }

    async fn process_event(
        &self,
        store_id: i64,
        seller_id: i64,
        month: u32,
        year: i32,
        as_of: DateTime<Utc>,
    ) -> Result<SaleOutcome, AppError> {
        let settings = self.store_settings(store_id).await?;
        let status = settings.status(as_of);
        if status != GamificationStatus::Active {
            debug!(store_id, %status, "Gamification window inactive, skipping");
            return Ok(SaleOutcome::Skipped { status });
        }

        let new_achievements = self.evaluator.evaluate(store_id, seller_id, as_of).await?;
        let score = self
            .aggregator
            .recompute(store_id, seller_id, month, year)
            .await?;

        info!(
            store_id,
            seller_id,
            new_unlocks = new_achievements.len(),
            points = score.points,
            "Gamification pipeline completed"
        );
        Ok(SaleOutcome::Processed {
            new_achievements,
            score,
        })
    }

    async fn store_settings(&self, store_id: i64) -> Result<StoreGamificationSettings, AppError> {
        let settings = self.settings.get_settings(store_id).await?;
        // A store that never configured gamification participates with
        // the defaults
        Ok(settings.unwrap_or_else(|| StoreGamificationSettings::defaults(store_id)))
    }
}

/// Subscribes the gamification pipeline to sale and goal events.
///
/// This is glue, not core: failures are logged and swallowed so one bad
/// event cannot stall the subscriber loop, and the next event for the
/// same seller recomputes everything from scratch anyway.
pub struct StoreEventSubscriber {
    service: Arc<GamificationService>,
}

impl StoreEventSubscriber {
    pub fn new(service: Arc<GamificationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl StoreEventHandler for StoreEventSubscriber {
    async fn handle_event(&self, event: StoreEvent) -> Result<(), EventError> {
        match event {
            StoreEvent::SaleRecorded {
                store_id,
                seller_id,
            } => {
                if let Err(err) = self
                    .service
                    .process_sale(store_id, seller_id, Utc::now())
                    .await
                {
                    error!(?err, store_id, seller_id, "Failed to process sale event");
                }
            }
            StoreEvent::GoalUpdated {
                store_id,
                seller_id,
                month,
                year,
            } => {
                if let Err(err) = self
                    .service
                    .process_goal_update(store_id, seller_id, month, year, Utc::now())
                    .await
                {
                    error!(?err, store_id, seller_id, "Failed to process goal event");
                }
            }
        }

        Ok(())
    }

    fn handler_name(&self) -> &'static str {
        "StoreEventSubscriber"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievement::repository::InMemoryAchievementLedger;
    use crate::badge::models::{Badge, BadgeType};
    use crate::badge::repository::InMemoryBadgeCatalog;
    use crate::sales::models::SaleRecord;
    use crate::sales::repository::InMemorySalesRepository;
    use crate::score::repository::InMemoryScoreRepository;
    use crate::store::repository::InMemoryStoreSettings;
    use crate::goals::repository::InMemoryGoalsRepository;

    struct Fixture {
        sales: Arc<InMemorySalesRepository>,
        settings: Arc<InMemoryStoreSettings>,
        scores: Arc<InMemoryScoreRepository>,
        service: GamificationService,
    }

    fn fixture(badges: Vec<Badge>) -> Fixture {
        let sales = Arc::new(InMemorySalesRepository::new());
        let settings = Arc::new(InMemoryStoreSettings::new());
        let scores = Arc::new(InMemoryScoreRepository::new());
        let service = GamificationService::new(
            Arc::new(InMemoryBadgeCatalog::with_badges(badges)),
            Arc::new(InMemoryAchievementLedger::new()),
            scores.clone(),
            sales.clone(),
            Arc::new(InMemoryGoalsRepository::new()),
            settings.clone(),
        );
        Fixture {
            sales,
            settings,
            scores,
            service,
        }
    }

    fn badge(id: i64, requirement: i64) -> Badge {
        Badge {
            id,
            name: format!("badge-{}", id),
            description: "test".to_string(),
            icon: "🏅".to_string(),
            badge_type: BadgeType::Sales,
            requirement,
            color: "#3B82F6".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn sale(store_id: i64, seller_id: i64) -> SaleRecord {
        SaleRecord {
            id: 0,
            store_id,
            seller_id,
            sale_price: 120_000,
            additional_items_count: 2,
            additional_items_value: 6_000,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn process_sale_unlocks_and_scores() {
        let f = fixture(vec![badge(1, 1)]);
        f.sales.record_sale(sale(1, 10));

        let outcome = f.service.process_sale(1, 10, Utc::now()).await.unwrap();
        match outcome {
            SaleOutcome::Processed {
                new_achievements,
                score,
            } => {
                assert_eq!(new_achievements.len(), 1);
                // 1 sale + 1 badge
                assert_eq!(score.points, 10 + 50);
            }
            SaleOutcome::Skipped { .. } => panic!("expected processing"),
        }
    }

    #[tokio::test]
    async fn disabled_store_skips_the_pipeline() {
        let f = fixture(vec![badge(1, 1)]);
        f.sales.record_sale(sale(1, 10));
        f.settings.insert(StoreGamificationSettings {
            enabled: false,
            ..StoreGamificationSettings::defaults(1)
        });

        let outcome = f.service.process_sale(1, 10, Utc::now()).await.unwrap();
        assert!(matches!(
            outcome,
            SaleOutcome::Skipped {
                status: GamificationStatus::Disabled
            }
        ));
        assert_eq!(f.scores.score_count(), 0);
    }

    #[tokio::test]
    async fn unconfigured_store_participates_with_defaults() {
        let f = fixture(vec![]);
        f.sales.record_sale(sale(1, 10));

        let outcome = f.service.process_sale(1, 10, Utc::now()).await.unwrap();
        assert!(matches!(outcome, SaleOutcome::Processed { .. }));
    }

    #[tokio::test]
    async fn subscriber_routes_events_to_the_pipeline() {
        let f = fixture(vec![badge(1, 1)]);
        f.sales.record_sale(sale(1, 10));
        let subscriber = StoreEventSubscriber::new(Arc::new(f.service));

        subscriber
            .handle_event(StoreEvent::SaleRecorded {
                store_id: 1,
                seller_id: 10,
            })
            .await
            .unwrap();

        let score = f.scores.get_score(1, 10, Utc::now().month(), Utc::now().year())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(score.sales_count, 1);
    }

    #[tokio::test]
    async fn aggregated_points_use_store_configuration() {
        let f = fixture(vec![]);
        f.settings.insert(StoreGamificationSettings {
            fixed_points_per_item: 7,
            ..StoreGamificationSettings::defaults(1)
        });

        assert_eq!(f.service.aggregated_sale_points(1, 3, 0).await.unwrap(), 21);
        // Unconfigured store falls back to the default 5 per item
        assert_eq!(f.service.aggregated_sale_points(2, 3, 0).await.unwrap(), 15);
    }
}
