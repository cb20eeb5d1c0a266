use chrono::{DateTime, Datelike, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::achievement::models::NewAchievement;
use crate::achievement::repository::AchievementLedger;
use crate::achievement::Achievement;
use crate::badge::models::BadgeType;
use crate::badge::repository::BadgeCatalog;
use crate::sales::repository::SalesReader;
use crate::shared::AppError;

/// Evaluates a seller's sales history against the active badge catalog
/// and appends every newly qualifying unlock to the ledger.
///
/// Evaluation trusts the caller: nonexistent stores or sellers simply
/// produce empty inputs and no unlocks.
pub struct BadgeEvaluator {
    sales: Arc<dyn SalesReader>,
    achievements: Arc<dyn AchievementLedger>,
    badges: Arc<dyn BadgeCatalog>,
}

impl BadgeEvaluator {
    pub fn new(
        sales: Arc<dyn SalesReader>,
        achievements: Arc<dyn AchievementLedger>,
        badges: Arc<dyn BadgeCatalog>,
    ) -> Self {
        Self {
            sales,
            achievements,
            badges,
        }
    }

    /// Unlocks every active badge the seller now qualifies for and
    /// returns the achievements created by this call.
    ///
    /// `as_of` is the evaluation instant; milestone badges sum sale
    /// value over `as_of`'s calendar month. Re-running with unchanged
    /// sales yields an empty result: already-unlocked badges are
    /// skipped, so unlocking is idempotent per badge.
    ///
    /// Appends are per-record. If one append fails, earlier unlocks
    /// from the same call remain; callers must treat evaluation as
    /// re-runnable rather than transactional.
    #[instrument(skip(self))]
    pub async fn evaluate(
        &self,
        store_id: i64,
        seller_id: i64,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<Achievement>, AppError> {
        let sales = self.sales.list_sales(store_id, seller_id).await?;
        let sales_count = sales.len() as i64;
        let monthly_sales: i64 = sales
            .iter()
            .filter(|s| s.created_at.month() == as_of.month() && s.created_at.year() == as_of.year())
            .map(|s| s.sale_price)
            .sum();

        let unlocked: HashSet<i64> = self
            .achievements
            .list_achievements(store_id, seller_id)
            .await?
            .iter()
            .map(|a| a.badge_id)
            .collect();

        let mut new_achievements = Vec::new();
        for badge in self.badges.list_active_badges().await? {
            if unlocked.contains(&badge.id) {
                continue;
            }

            let qualifies = match badge.badge_type {
                BadgeType::Sales => sales_count >= badge.requirement,
                BadgeType::Milestone => monthly_sales >= badge.requirement,
                // Unlocked by external processes directly through the
                // ledger; never auto-evaluated here
                BadgeType::Target | BadgeType::Streak => false,
            };
            if !qualifies {
                continue;
            }

            let achievement = self
                .achievements
                .append_achievement(NewAchievement {
                    store_id,
                    seller_id,
                    badge_id: badge.id,
                    unlocked_at: as_of,
                })
                .await?;

            info!(
                store_id,
                seller_id,
                badge_id = badge.id,
                badge_name = %badge.name,
                "Badge unlocked"
            );
            new_achievements.push(achievement);
        }

        debug!(
            store_id,
            seller_id,
            new_unlocks = new_achievements.len(),
            "Badge evaluation finished"
        );
        Ok(new_achievements)
    }
}
