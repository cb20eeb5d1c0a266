use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::models::{AggregatedPointsMode, StoreGamificationSettings};

/// One value bracket for range-mode aggregated-sales points.
/// Bounds are inclusive and in cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedSalesRange {
    pub min_value: i64,
    pub max_value: i64,
    pub points: i64,
}

/// Stock brackets for stores that pick range mode without configuring it
pub fn default_ranges() -> Vec<AggregatedSalesRange> {
    vec![
        AggregatedSalesRange {
            min_value: 0,
            max_value: 2_000,
            points: 3,
        },
        AggregatedSalesRange {
            min_value: 2_001,
            max_value: 5_000,
            points: 5,
        },
        AggregatedSalesRange {
            min_value: 5_001,
            max_value: 10_000,
            points: 8,
        },
        AggregatedSalesRange {
            min_value: 10_001,
            max_value: 99_999_999,
            points: 12,
        },
    ]
}

/// Bonus points for attach-rate items sold with a device.
///
/// Fixed mode pays a flat per-item rate. Range mode picks the per-item
/// rate by the average item value; an unparsable range config or an
/// average outside every bracket falls back to the fixed rate.
pub fn aggregated_sale_points(
    settings: &StoreGamificationSettings,
    items_count: i64,
    items_value: i64,
) -> i64 {
    if items_count <= 0 {
        return 0;
    }

    let fixed = items_count * settings.fixed_points_per_item;

    if settings.points_mode != AggregatedPointsMode::Range {
        return fixed;
    }

    let ranges = match &settings.ranges_json {
        Some(json) => match serde_json::from_str::<Vec<AggregatedSalesRange>>(json) {
            Ok(ranges) => ranges,
            Err(err) => {
                warn!(
                    store_id = settings.store_id,
                    error = %err,
                    "Invalid aggregated sales ranges, falling back to fixed points"
                );
                return fixed;
            }
        },
        None => default_ranges(),
    };

    let avg_value_per_item = items_value as f64 / items_count as f64;
    match ranges
        .iter()
        .find(|r| avg_value_per_item >= r.min_value as f64 && avg_value_per_item <= r.max_value as f64)
    {
        Some(range) => items_count * range.points,
        None => fixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn settings(mode: AggregatedPointsMode, ranges_json: Option<&str>) -> StoreGamificationSettings {
        StoreGamificationSettings {
            points_mode: mode,
            ranges_json: ranges_json.map(|s| s.to_string()),
            ..StoreGamificationSettings::defaults(1)
        }
    }

    #[test]
    fn zero_items_earn_nothing() {
        let s = settings(AggregatedPointsMode::Fixed, None);
        assert_eq!(aggregated_sale_points(&s, 0, 10_000), 0);
    }

    #[test]
    fn fixed_mode_pays_per_item() {
        let s = settings(AggregatedPointsMode::Fixed, None);
        assert_eq!(aggregated_sale_points(&s, 3, 9_000), 15);
    }

    #[rstest]
    #[case(2, 3_000, 6)] // avg 15.00 BRL -> lowest bracket, 3/item
    #[case(2, 8_000, 10)] // avg 40.00 BRL -> second bracket, 5/item
    #[case(1, 7_500, 8)] // 75.00 BRL -> third bracket
    #[case(4, 480_000, 48)] // avg 1200.00 BRL -> top bracket, 12/item
    fn range_mode_uses_default_brackets(
        #[case] count: i64,
        #[case] value: i64,
        #[case] expected: i64,
    ) {
        let s = settings(AggregatedPointsMode::Range, None);
        assert_eq!(aggregated_sale_points(&s, count, value), expected);
    }

    #[test]
    fn range_mode_reads_configured_brackets() {
        let json = r#"[{"min_value": 0, "max_value": 100000, "points": 7}]"#;
        let s = settings(AggregatedPointsMode::Range, Some(json));
        assert_eq!(aggregated_sale_points(&s, 2, 5_000), 14);
    }

    #[test]
    fn corrupt_range_config_falls_back_to_fixed() {
        let s = settings(AggregatedPointsMode::Range, Some("not json"));
        assert_eq!(aggregated_sale_points(&s, 2, 5_000), 10);
    }

    #[test]
    fn average_outside_every_bracket_falls_back_to_fixed() {
        let json = r#"[{"min_value": 1000, "max_value": 2000, "points": 9}]"#;
        let s = settings(AggregatedPointsMode::Range, Some(json));
        assert_eq!(aggregated_sale_points(&s, 2, 10_000), 10);
    }
}
