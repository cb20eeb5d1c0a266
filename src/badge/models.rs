use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Unlock rule family of a badge. The `requirement` threshold is
/// interpreted against a different quantity for each type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BadgeType {
    /// Lifetime sales count reaches the requirement
    Sales,
    /// Unlocked externally when a target is hit; never auto-evaluated
    Target,
    /// Unlocked externally from selling-streak tracking; never auto-evaluated
    Streak,
    /// Current calendar month's summed sale value reaches the requirement
    Milestone,
}

/// An achievement definition administered per deployment.
///
/// Badges are read-only to the scoring engine; active badges with
/// unlocked instances must not be deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Emoji or icon name for the UI
    pub icon: String,
    #[serde(rename = "type")]
    pub badge_type: BadgeType,
    /// Integer threshold; sales count for `sales`, cents for `milestone`
    pub requirement: i64,
    pub color: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for badge administration
#[derive(Debug, Clone, Deserialize)]
pub struct NewBadge {
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub badge_type: BadgeType,
    pub requirement: i64,
    #[serde(default = "default_badge_color")]
    pub color: String,
}

fn default_badge_color() -> String {
    "#3B82F6".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn badge_type_round_trips_through_strings() {
        assert_eq!(BadgeType::from_str("sales").unwrap(), BadgeType::Sales);
        assert_eq!(
            BadgeType::from_str("milestone").unwrap(),
            BadgeType::Milestone
        );
        assert_eq!(BadgeType::Streak.to_string(), "streak");
        assert!(BadgeType::from_str("unknown").is_err());
    }

    #[test]
    fn new_badge_defaults_color_when_absent() {
        let badge: NewBadge = serde_json::from_str(
            r#"{"name": "First Sale", "description": "Sell one device",
                "icon": "🏅", "type": "sales", "requirement": 1}"#,
        )
        .unwrap();

        assert_eq!(badge.color, "#3B82F6");
        assert_eq!(badge.badge_type, BadgeType::Sales);
    }
}
