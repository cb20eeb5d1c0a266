use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// How bonus points for attach-rate items are computed for a store
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AggregatedPointsMode {
    /// Flat points per attached item
    Fixed,
    /// Per-item points chosen by the average item value
    Range,
}

/// Lifecycle state of a store's gamification campaign
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GamificationStatus {
    Disabled,
    NotStarted,
    Ended,
    Active,
}

/// Per-store gamification configuration, administered by the tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreGamificationSettings {
    pub store_id: i64,
    pub enabled: bool,
    /// Campaign start; unset means it started immediately
    pub start_date: Option<DateTime<Utc>>,
    /// Campaign end; unset means it runs indefinitely
    pub end_date: Option<DateTime<Utc>>,
    pub points_mode: AggregatedPointsMode,
    /// Flat per-item bonus, also the fallback for range mode
    pub fixed_points_per_item: i64,
    /// JSON-encoded value ranges for range mode
    pub ranges_json: Option<String>,
}

impl StoreGamificationSettings {
    /// Default configuration for a store that never touched the settings
    pub fn defaults(store_id: i64) -> Self {
        Self {
            store_id,
            enabled: true,
            start_date: None,
            end_date: None,
            points_mode: AggregatedPointsMode::Fixed,
            fixed_points_per_item: 5,
            ranges_json: None,
        }
    }

    /// Campaign status at the given instant
    pub fn status(&self, now: DateTime<Utc>) -> GamificationStatus {
        if !self.enabled {
            return GamificationStatus::Disabled;
        }
        if let Some(start) = self.start_date {
            if start > now {
                return GamificationStatus::NotStarted;
            }
        }
        if let Some(end) = self.end_date {
            if end < now {
                return GamificationStatus::Ended;
            }
        }
        GamificationStatus::Active
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == GamificationStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn defaults_are_active_fixed_mode() {
        let settings = StoreGamificationSettings::defaults(1);
        assert!(settings.is_active(Utc::now()));
        assert_eq!(settings.points_mode, AggregatedPointsMode::Fixed);
        assert_eq!(settings.fixed_points_per_item, 5);
    }

    #[test]
    fn disabled_wins_over_window() {
        let settings = StoreGamificationSettings {
            enabled: false,
            ..StoreGamificationSettings::defaults(1)
        };
        assert_eq!(settings.status(Utc::now()), GamificationStatus::Disabled);
    }

    #[test]
    fn window_bounds_are_honored() {
        let now = Utc::now();
        let settings = StoreGamificationSettings {
            start_date: Some(now + Duration::days(1)),
            ..StoreGamificationSettings::defaults(1)
        };
        assert_eq!(settings.status(now), GamificationStatus::NotStarted);

        let settings = StoreGamificationSettings {
            end_date: Some(now - Duration::days(1)),
            ..StoreGamificationSettings::defaults(1)
        };
        assert_eq!(settings.status(now), GamificationStatus::Ended);

        let settings = StoreGamificationSettings {
            start_date: Some(now - Duration::days(1)),
            end_date: Some(now + Duration::days(1)),
            ..StoreGamificationSettings::defaults(1)
        };
        assert_eq!(settings.status(now), GamificationStatus::Active);
    }
}
