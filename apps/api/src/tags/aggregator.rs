//! Per-product tag counts and confidence over the full comment set.
//!
//! Always a full recomputation: callers pass every comment of the product,
//! never a delta, so stored aggregates cannot drift from their comments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tags::extractor::TagSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TagAggregate {
    pub count: u32,
    /// count / number of comments, in [0, 1]
    pub confidence: f64,
}

/// tag key → aggregate, ordered by key so serialization is stable.
pub type AggregateMap = BTreeMap<String, TagAggregate>;

/// Aggregates one product's comment tag sets.
///
/// Every input set counts towards `N`, including empty ones. Zero comments
/// yields an empty map.
pub fn aggregate<'a, I>(tag_sets: I) -> AggregateMap
where
    I: IntoIterator<Item = &'a TagSet>,
{
    let mut total: u32 = 0;
    let mut counts: BTreeMap<&'a str, u32> = BTreeMap::new();

    for tags in tag_sets {
        total += 1;
        for key in tags {
            *counts.entry(key.as_str()).or_insert(0) += 1;
        }
    }

    if total == 0 {
        return AggregateMap::new();
    }

    counts
        .into_iter()
        .map(|(key, count)| {
            (
                key.to_string(),
                TagAggregate {
                    count,
                    confidence: f64::from(count) / f64::from(total),
                },
            )
        })
        .collect()
}

/// Confidence of `key`, 0 when absent.
pub fn confidence_of(aggregates: &AggregateMap, key: &str) -> f64 {
    aggregates.get(key).map(|a| a.confidence).unwrap_or(0.0)
}

/// Count of `key`, 0 when absent.
pub fn count_of(aggregates: &AggregateMap, key: &str) -> u32 {
    aggregates.get(key).map(|a| a.count).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::extractor::extract;
    use crate::tags::vocabulary::TagVocabulary;

    fn set(keys: &[&str]) -> TagSet {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_empty_input_yields_empty_map() {
        let sets: Vec<TagSet> = vec![];
        assert!(aggregate(&sets).is_empty());
    }

    #[test]
    fn test_comments_without_tags_still_count_towards_total() {
        let sets = vec![set(&["finish_matte"]), set(&[]), set(&[]), set(&[])];
        let agg = aggregate(&sets);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg["finish_matte"].count, 1);
        assert_eq!(agg["finish_matte"].confidence, 0.25);
    }

    #[test]
    fn test_only_empty_sets_yield_empty_map() {
        let sets = vec![set(&[]), set(&[])];
        assert!(aggregate(&sets).is_empty());
    }

    #[test]
    fn test_scenario_three_comments() {
        let vocab = TagVocabulary::builtin().unwrap();
        let sets: Vec<TagSet> = [
            "Great for oily skin, matte finish, lasts all day",
            "Too drying for my dry skin",
            "Perfect for combination skin, dewy finish",
        ]
        .iter()
        .map(|text| extract(&vocab, text))
        .collect();

        let agg = aggregate(&sets);
        for key in ["skin_type_dry", "skin_type_oily", "skin_type_combination"] {
            assert_eq!(agg[key].count, 1, "{key}");
            assert_eq!(agg[key].confidence, 1.0 / 3.0, "{key}");
        }
    }

    #[test]
    fn test_confidence_is_exactly_count_over_total_and_bounded() {
        let sets = vec![
            set(&["a", "b"]),
            set(&["a"]),
            set(&["a", "c"]),
            set(&[]),
            set(&["b"]),
            set(&["a", "b", "c"]),
            set(&["c"]),
        ];
        let agg = aggregate(&sets);
        for entry in agg.values() {
            assert!((0.0..=1.0).contains(&entry.confidence));
            assert_eq!(entry.confidence, f64::from(entry.count) / 7.0);
        }
        assert_eq!(agg["a"].count, 4);
        assert_eq!(agg["b"].count, 3);
        assert_eq!(agg["c"].count, 3);
    }

    #[test]
    fn test_tag_in_every_comment_has_full_confidence() {
        let sets = vec![set(&["a"]), set(&["a", "b"])];
        assert_eq!(aggregate(&sets)["a"].confidence, 1.0);
    }

    #[test]
    fn test_count_never_exceeds_comment_total() {
        // Sets cannot hold a key twice, so repeated evidence in one comment counts once.
        let vocab = TagVocabulary::builtin().unwrap();
        let sets = vec![
            extract(&vocab, "matte matte matte, velvety matte finish"),
            extract(&vocab, "matte again"),
        ];
        let agg = aggregate(&sets);
        assert_eq!(agg["finish_matte"].count, 2);
        assert_eq!(agg["finish_matte"].confidence, 1.0);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let forward = vec![set(&["a"]), set(&["b"]), set(&["a", "b"])];
        let reversed: Vec<TagSet> = forward.iter().rev().cloned().collect();
        assert_eq!(aggregate(&forward), aggregate(&reversed));
    }

    #[test]
    fn test_reaggregation_is_byte_identical() {
        let sets = vec![set(&["x", "y"]), set(&["y"]), set(&["z"])];
        let first = serde_json::to_string(&aggregate(&sets)).unwrap();
        let second = serde_json::to_string(&aggregate(&sets)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_absent_key_defaults_to_zero() {
        let agg = AggregateMap::new();
        assert_eq!(confidence_of(&agg, "finish_matte"), 0.0);
        assert_eq!(count_of(&agg, "finish_matte"), 0);
    }
}
