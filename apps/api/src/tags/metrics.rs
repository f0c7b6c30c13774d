//! Derived metrics over a product's aggregate map.
//!
//! Every function here is pure and treats a missing tag as confidence 0,
//! falling back to a neutral value instead of failing on sparse data.

use crate::tags::aggregator::{confidence_of, AggregateMap, TagAggregate};
use crate::tags::catalog::{SKIN_TYPE_COMBINATION, SKIN_TYPE_DRY, SKIN_TYPE_OILY};
use crate::tags::vocabulary::{TagCategory, TagVocabulary};

pub const NEUTRAL: f64 = 0.5;

/// Only tags mentioned by more than this share of comments reach the summary.
pub const SUMMARY_MIN_CONFIDENCE: f64 = 0.3;

const VARIED_CHARACTERISTICS: &str = "varied characteristics";

/// Skin-type suitability: 0 = reported for dry skin only, 1 = oily only.
/// Combination counts half-way. 0.5 when no skin-type tag is present.
pub fn skin_type_scale(aggregates: &AggregateMap) -> f64 {
    let dry = confidence_of(aggregates, SKIN_TYPE_DRY);
    let oily = confidence_of(aggregates, SKIN_TYPE_OILY);
    let combination = confidence_of(aggregates, SKIN_TYPE_COMBINATION);

    let total = dry + oily + combination;
    if total == 0.0 {
        return NEUTRAL;
    }
    (oily + 0.5 * combination) / total
}

/// Position between two opposite poles: p / (p + n), 0.5 when neither pole is reported.
pub fn perception_value(aggregates: &AggregateMap, positive_key: &str, negative_key: &str) -> f64 {
    let positive = confidence_of(aggregates, positive_key);
    let negative = confidence_of(aggregates, negative_key);
    if positive + negative == 0.0 {
        return NEUTRAL;
    }
    positive / (positive + negative)
}

/// Entries sorted by confidence, highest first; equal confidences keep key order.
pub fn sorted_by_confidence(aggregates: &AggregateMap) -> Vec<(&str, &TagAggregate)> {
    let mut entries: Vec<_> = aggregates.iter().map(|(k, v)| (k.as_str(), v)).collect();
    entries.sort_by(|a, b| b.1.confidence.total_cmp(&a.1.confidence));
    entries
}

/// One-sentence neutral summary naming the dominant finish and coverage.
///
/// `comment_count` is the product's total number of comments; the 0.3
/// confidence filter only decides which tags may be named.
pub fn product_summary(
    vocabulary: &TagVocabulary,
    product_name: &str,
    aggregates: &AggregateMap,
    comment_count: usize,
) -> String {
    let candidates: Vec<_> = sorted_by_confidence(aggregates)
        .into_iter()
        .filter(|(_, agg)| agg.confidence > SUMMARY_MIN_CONFIDENCE)
        .filter_map(|(key, _)| vocabulary.get(key))
        .collect();

    let parts: Vec<String> = [TagCategory::Finish, TagCategory::Coverage]
        .into_iter()
        .filter_map(|category| candidates.iter().find(|d| d.category == category))
        .map(|d| d.label.to_lowercase())
        .collect();

    let described = if parts.is_empty() {
        VARIED_CHARACTERISTICS.to_string()
    } else {
        parts.join(", ")
    };
    let noun = if comment_count == 1 { "comment" } else { "comments" };

    format!(
        "Based on {comment_count} user {noun}, {product_name} is often described as having {described}."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(entries: &[(&str, u32, f64)]) -> AggregateMap {
        entries
            .iter()
            .map(|(k, count, confidence)| {
                (
                    k.to_string(),
                    TagAggregate {
                        count: *count,
                        confidence: *confidence,
                    },
                )
            })
            .collect()
    }

    fn vocab() -> TagVocabulary {
        TagVocabulary::builtin().unwrap()
    }

    #[test]
    fn test_skin_scale_neutral_without_skin_tags() {
        assert_eq!(skin_type_scale(&AggregateMap::new()), 0.5);
        assert_eq!(skin_type_scale(&agg(&[("finish_matte", 3, 1.0)])), 0.5);
    }

    #[test]
    fn test_skin_scale_extremes() {
        assert_eq!(skin_type_scale(&agg(&[("skin_type_dry", 2, 0.4)])), 0.0);
        assert_eq!(skin_type_scale(&agg(&[("skin_type_oily", 2, 0.4)])), 1.0);
        assert_eq!(skin_type_scale(&agg(&[("skin_type_combination", 2, 0.4)])), 0.5);
    }

    #[test]
    fn test_skin_scale_scenario_equal_thirds() {
        let third = 1.0 / 3.0;
        let map = agg(&[
            ("skin_type_dry", 1, third),
            ("skin_type_oily", 1, third),
            ("skin_type_combination", 1, third),
        ]);
        assert!((skin_type_scale(&map) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_skin_scale_weighted() {
        // (0.6 + 0.5*0.2) / (0.2 + 0.6 + 0.2) = 0.7
        let map = agg(&[
            ("skin_type_dry", 1, 0.2),
            ("skin_type_oily", 3, 0.6),
            ("skin_type_combination", 1, 0.2),
        ]);
        assert!((skin_type_scale(&map) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_perception_neutral_when_both_poles_absent() {
        assert_eq!(
            perception_value(&AggregateMap::new(), "longevity_long", "longevity_short"),
            0.5
        );
    }

    #[test]
    fn test_perception_ratio() {
        let map = agg(&[("longevity_long", 3, 0.6), ("longevity_short", 1, 0.2)]);
        let value = perception_value(&map, "longevity_long", "longevity_short");
        assert!((value - 0.75).abs() < 1e-12);
        assert_eq!(perception_value(&map, "longevity_long", "missing"), 1.0);
        assert_eq!(perception_value(&map, "missing", "longevity_long"), 0.0);
    }

    #[test]
    fn test_summary_zero_comments() {
        let summary = product_summary(&vocab(), "Silk Foundation", &AggregateMap::new(), 0);
        assert_eq!(
            summary,
            "Based on 0 user comments, Silk Foundation is often described as having varied characteristics."
        );
    }

    #[test]
    fn test_summary_singular_comment() {
        let map = agg(&[("finish_matte", 1, 1.0)]);
        let summary = product_summary(&vocab(), "Velvet Base", &map, 1);
        assert_eq!(
            summary,
            "Based on 1 user comment, Velvet Base is often described as having matte finish."
        );
    }

    #[test]
    fn test_summary_finish_then_coverage() {
        let map = agg(&[
            ("coverage_full", 8, 0.8),
            ("finish_dewy", 4, 0.4),
            ("finish_matte", 5, 0.5),
        ]);
        let summary = product_summary(&vocab(), "Glow Tint", &map, 10);
        assert_eq!(
            summary,
            "Based on 10 user comments, Glow Tint is often described as having matte finish, full coverage."
        );
    }

    #[test]
    fn test_summary_ignores_tags_at_or_below_threshold() {
        let map = agg(&[("finish_matte", 3, 0.3), ("coverage_sheer", 1, 0.1)]);
        let summary = product_summary(&vocab(), "Air Powder", &map, 10);
        assert!(summary.ends_with("having varied characteristics."));
        assert!(summary.starts_with("Based on 10 user comments"));
    }

    #[test]
    fn test_summary_coverage_only() {
        let map = agg(&[("coverage_medium", 4, 0.4), ("skin_type_oily", 9, 0.9)]);
        let summary = product_summary(&vocab(), "Cover Stick", &map, 10);
        assert!(summary.ends_with("having medium coverage."));
    }

    #[test]
    fn test_summary_skips_unknown_keys() {
        let map = agg(&[("finish_glitter", 9, 0.9), ("finish_satin", 5, 0.5)]);
        let summary = product_summary(&vocab(), "Satin Veil", &map, 10);
        assert!(summary.ends_with("having satin finish."));
    }

    #[test]
    fn test_sorted_by_confidence_ties_keep_key_order() {
        let map = agg(&[("b", 1, 0.5), ("a", 1, 0.5), ("c", 2, 0.9)]);
        let keys: Vec<_> = sorted_by_confidence(&map).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }
}
