//! Product insight view: aggregates resolved against the vocabulary plus
//! the derived metrics shown on a product page.

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::product::ProductRow;
use crate::store::InsightStore;
use crate::tags::aggregator::count_of;
use crate::tags::catalog::{
    COVERAGE_FULL, FINISH_DEWY, FINISH_MATTE, ISSUE_NO_OXIDATION, LONGEVITY_LONG, LONGEVITY_SHORT,
    PROPERTY_HYDRATING, PROPERTY_LIGHTWEIGHT, PROPERTY_OIL_CONTROL,
};
use crate::tags::metrics::{perception_value, product_summary, skin_type_scale, sorted_by_confidence};
use crate::tags::{AggregateMap, TagCategory, TagVocabulary, VocabularyError};

pub const MAX_TOP_FACTS: usize = 5;

const FILL_MIN_CONFIDENCE: f64 = 0.25;
const POSITIVE_ISSUE_PREFIX: &str = "issue_no_";

/// An aggregate entry joined with its vocabulary definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTag {
    pub key: String,
    pub label: String,
    pub category: TagCategory,
    pub count: u32,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerceptionSlider {
    pub label: &'static str,
    pub value: f64,
    pub left_label: &'static str,
    pub right_label: &'static str,
    pub user_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinTypeReading {
    Dry,
    Combination,
    Oily,
}

impl SkinTypeReading {
    pub fn from_scale(scale: f64) -> Self {
        if scale < 0.33 {
            SkinTypeReading::Dry
        } else if scale > 0.66 {
            SkinTypeReading::Oily
        } else {
            SkinTypeReading::Combination
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductInsights {
    pub product: ProductRow,
    pub comment_count: usize,
    pub tags: Vec<ResolvedTag>,
    pub skin_type_scale: f64,
    pub skin_type_reading: SkinTypeReading,
    pub sliders: Vec<PerceptionSlider>,
    pub summary: String,
    pub top_facts: Vec<String>,
    pub positive_share: f64,
}

/// Joins every aggregate with its definition, highest confidence first.
/// A stored key the vocabulary does not know is reported, not skipped.
pub fn resolve_tags(
    vocabulary: &TagVocabulary,
    aggregates: &AggregateMap,
) -> Result<Vec<ResolvedTag>, VocabularyError> {
    sorted_by_confidence(aggregates)
        .into_iter()
        .map(|(key, agg)| -> Result<ResolvedTag, VocabularyError> {
            let definition = vocabulary.lookup(key).map_err(|err| {
                warn!("Aggregate references unknown tag '{key}'");
                err
            })?;
            Ok(ResolvedTag {
                key: key.to_string(),
                label: definition.label.clone(),
                category: definition.category,
                count: agg.count,
                confidence: agg.confidence,
            })
        })
        .collect()
}

fn category_count(tags: &[ResolvedTag], category: TagCategory) -> u32 {
    tags.iter()
        .filter(|t| t.category == category)
        .map(|t| t.count)
        .sum()
}

fn confidence_or(aggregates: &AggregateMap, key: &str, default: f64) -> f64 {
    aggregates.get(key).map_or(default, |a| a.confidence)
}

/// The fixed slider set of a product page.
pub fn perception_sliders(aggregates: &AggregateMap, tags: &[ResolvedTag]) -> Vec<PerceptionSlider> {
    vec![
        PerceptionSlider {
            label: "Longevity",
            value: perception_value(aggregates, LONGEVITY_LONG, LONGEVITY_SHORT),
            left_label: "Short wear",
            right_label: "Long lasting",
            user_count: count_of(aggregates, LONGEVITY_LONG) + count_of(aggregates, LONGEVITY_SHORT),
        },
        PerceptionSlider {
            label: "Coverage",
            value: confidence_or(aggregates, COVERAGE_FULL, 0.3),
            left_label: "Sheer",
            right_label: "Full coverage",
            user_count: category_count(tags, TagCategory::Coverage),
        },
        PerceptionSlider {
            label: "Finish",
            value: perception_value(aggregates, FINISH_MATTE, FINISH_DEWY),
            left_label: "Dewy",
            right_label: "Matte",
            user_count: category_count(tags, TagCategory::Finish),
        },
        PerceptionSlider {
            label: "Oil Control",
            value: confidence_or(aggregates, PROPERTY_OIL_CONTROL, 0.5),
            left_label: "Low",
            right_label: "High",
            user_count: count_of(aggregates, PROPERTY_OIL_CONTROL),
        },
        PerceptionSlider {
            label: "Hydration",
            value: confidence_or(aggregates, PROPERTY_HYDRATING, 0.5),
            left_label: "Drying",
            right_label: "Hydrating",
            user_count: count_of(aggregates, PROPERTY_HYDRATING),
        },
        PerceptionSlider {
            label: "Comfort",
            value: confidence_or(aggregates, PROPERTY_LIGHTWEIGHT, 0.6),
            left_label: "Heavy",
            right_label: "Lightweight",
            user_count: count_of(aggregates, PROPERTY_LIGHTWEIGHT),
        },
    ]
}

fn percent(confidence: f64) -> u32 {
    (confidence * 100.0).round() as u32
}

/// Short headline facts. `tags` must already be sorted by confidence.
pub fn top_facts(tags: &[ResolvedTag]) -> Vec<String> {
    let mut facts = Vec::new();
    let mut used: HashSet<&str> = HashSet::new();

    let leading = |category: TagCategory| tags.iter().find(|t| t.category == category);

    if let Some(t) = leading(TagCategory::Finish).filter(|t| t.confidence > 0.3) {
        facts.push(format!(
            "{}% of users describe it as {}",
            percent(t.confidence),
            t.label.to_lowercase()
        ));
        used.insert(t.key.as_str());
    }
    if let Some(t) = leading(TagCategory::Coverage).filter(|t| t.confidence > 0.3) {
        facts.push(format!("Most commonly rated as {}", t.label.to_lowercase()));
        used.insert(t.key.as_str());
    }
    if let Some(t) = leading(TagCategory::SkinType).filter(|t| t.confidence > 0.4) {
        facts.push(format!("Works well for {}", t.label.to_lowercase()));
        used.insert(t.key.as_str());
    }
    if let Some(t) = leading(TagCategory::Longevity).filter(|t| t.confidence > 0.3) {
        facts.push(format!("{} according to user feedback", t.label));
        used.insert(t.key.as_str());
    }
    if let Some(t) = tags
        .iter()
        .find(|t| t.key == ISSUE_NO_OXIDATION)
        .filter(|t| t.confidence > 0.3)
    {
        facts.push(format!("{}% report no oxidation issues", percent(t.confidence)));
        used.insert(t.key.as_str());
    }

    for t in tags {
        if facts.len() >= MAX_TOP_FACTS {
            break;
        }
        if t.confidence > FILL_MIN_CONFIDENCE && !used.contains(t.key.as_str()) {
            facts.push(format!(
                "{}% mention: {}",
                percent(t.confidence),
                t.label.to_lowercase()
            ));
        }
    }

    facts.truncate(MAX_TOP_FACTS);
    facts
}

/// Mean confidence of the favourable tags over all aggregate entries.
/// Issue tags count only in their `issue_no_*` form.
pub fn positive_share(tags: &[ResolvedTag]) -> f64 {
    if tags.is_empty() {
        return 0.0;
    }
    let positive: f64 = tags
        .iter()
        .filter(|t| t.category != TagCategory::Issue || t.key.starts_with(POSITIVE_ISSUE_PREFIX))
        .map(|t| t.confidence)
        .sum();
    positive / tags.len() as f64
}

pub fn build_insights(
    vocabulary: &TagVocabulary,
    product: ProductRow,
    aggregates: &AggregateMap,
    comment_count: usize,
) -> Result<ProductInsights, AppError> {
    let tags = resolve_tags(vocabulary, aggregates)?;
    let scale = skin_type_scale(aggregates);

    Ok(ProductInsights {
        summary: product_summary(vocabulary, &product.name, aggregates, comment_count),
        sliders: perception_sliders(aggregates, &tags),
        top_facts: top_facts(&tags),
        positive_share: positive_share(&tags),
        skin_type_scale: scale,
        skin_type_reading: SkinTypeReading::from_scale(scale),
        comment_count,
        tags,
        product,
    })
}

/// Reads the stored aggregates of one product and builds its insight view.
pub async fn load_insights(
    store: &dyn InsightStore,
    vocabulary: &TagVocabulary,
    product_id: Uuid,
) -> Result<ProductInsights, AppError> {
    let product = store
        .get_product(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {product_id} not found")))?;

    let aggregates = store.product_aggregates(product_id).await?;
    let comment_count = store.count_comments(product_id).await?;

    build_insights(vocabulary, product, &aggregates, comment_count)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::store::MemoryStore;
    use crate::tags::TagAggregate;

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

    fn product(name: &str) -> ProductRow {
        ProductRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            brand: None,
            category: "foundation".to_string(),
            published: true,
            created_at: Utc::now(),
        }
    }

    fn slider<'a>(sliders: &'a [PerceptionSlider], label: &str) -> &'a PerceptionSlider {
        sliders.iter().find(|s| s.label == label).unwrap()
    }

    #[test]
    fn test_resolve_sorts_and_labels() {
        let map = agg(&[("coverage_full", 1, 0.25), ("finish_matte", 3, 0.75)]);
        let tags = resolve_tags(&vocab(), &map).unwrap();
        assert_eq!(tags[0].key, "finish_matte");
        assert_eq!(tags[0].label, "Matte Finish");
        assert_eq!(tags[0].category, TagCategory::Finish);
        assert_eq!(tags[1].key, "coverage_full");
    }

    #[test]
    fn test_resolve_rejects_unknown_key() {
        let map = agg(&[("finish_glitter", 1, 1.0)]);
        let err = resolve_tags(&vocab(), &map).unwrap_err();
        assert!(matches!(err, VocabularyError::UnknownTag(k) if k == "finish_glitter"));
    }

    #[test]
    fn test_sliders_fall_back_to_defaults() {
        let sliders = perception_sliders(&AggregateMap::new(), &[]);
        assert_eq!(sliders.len(), 6);
        assert_eq!(slider(&sliders, "Longevity").value, 0.5);
        assert_eq!(slider(&sliders, "Coverage").value, 0.3);
        assert_eq!(slider(&sliders, "Finish").value, 0.5);
        assert_eq!(slider(&sliders, "Oil Control").value, 0.5);
        assert_eq!(slider(&sliders, "Hydration").value, 0.5);
        assert_eq!(slider(&sliders, "Comfort").value, 0.6);
        assert!(sliders.iter().all(|s| s.user_count == 0));
    }

    #[test]
    fn test_sliders_from_aggregates() {
        let map = agg(&[
            ("finish_matte", 3, 0.75),
            ("finish_dewy", 1, 0.25),
            ("coverage_full", 2, 0.5),
            ("coverage_sheer", 1, 0.25),
            ("longevity_long", 2, 0.5),
        ]);
        let tags = resolve_tags(&vocab(), &map).unwrap();
        let sliders = perception_sliders(&map, &tags);

        let finish = slider(&sliders, "Finish");
        assert_eq!(finish.value, 0.75);
        assert_eq!(finish.user_count, 4);
        assert_eq!((finish.left_label, finish.right_label), ("Dewy", "Matte"));

        let coverage = slider(&sliders, "Coverage");
        assert_eq!(coverage.value, 0.5);
        assert_eq!(coverage.user_count, 3);

        let longevity = slider(&sliders, "Longevity");
        assert_eq!(longevity.value, 1.0);
        assert_eq!(longevity.user_count, 2);
    }

    #[test]
    fn test_skin_type_reading_thresholds() {
        assert_eq!(SkinTypeReading::from_scale(0.0), SkinTypeReading::Dry);
        assert_eq!(SkinTypeReading::from_scale(0.32), SkinTypeReading::Dry);
        assert_eq!(SkinTypeReading::from_scale(0.33), SkinTypeReading::Combination);
        assert_eq!(SkinTypeReading::from_scale(0.5), SkinTypeReading::Combination);
        assert_eq!(SkinTypeReading::from_scale(0.66), SkinTypeReading::Combination);
        assert_eq!(SkinTypeReading::from_scale(0.67), SkinTypeReading::Oily);
    }

    #[test]
    fn test_top_facts_headline_categories() {
        let map = agg(&[
            ("finish_matte", 3, 0.75),
            ("coverage_full", 2, 0.5),
            ("skin_type_oily", 2, 0.5),
            ("longevity_long", 2, 0.5),
            ("issue_no_oxidation", 2, 0.5),
            ("property_blendable", 2, 0.5),
        ]);
        let tags = resolve_tags(&vocab(), &map).unwrap();
        assert_eq!(
            top_facts(&tags),
            vec![
                "75% of users describe it as matte finish",
                "Most commonly rated as full coverage",
                "Works well for oily skin",
                "Long Wear according to user feedback",
                "50% report no oxidation issues",
            ]
        );
    }

    #[test]
    fn test_top_facts_fill_from_remaining_tags() {
        let map = agg(&[
            ("property_lightweight", 5, 0.5),
            ("skin_type_dry", 4, 0.4),
            ("finish_dewy", 1, 0.1),
            ("issue_caking", 3, 0.3),
        ]);
        let tags = resolve_tags(&vocab(), &map).unwrap();
        assert_eq!(
            top_facts(&tags),
            vec![
                "50% mention: lightweight",
                "40% mention: dry skin",
                "30% mention: cakes",
            ]
        );
    }

    #[test]
    fn test_top_facts_empty() {
        assert!(top_facts(&[]).is_empty());
    }

    #[test]
    fn test_positive_share() {
        assert_eq!(positive_share(&[]), 0.0);

        let map = agg(&[
            ("finish_matte", 3, 0.75),
            ("issue_caking", 2, 0.5),
            ("issue_no_oxidation", 1, 0.25),
        ]);
        let tags = resolve_tags(&vocab(), &map).unwrap();
        assert!((positive_share(&tags) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_build_insights_without_comments() {
        let insights = build_insights(&vocab(), product("Velvet Base"), &AggregateMap::new(), 0)
            .unwrap();
        assert_eq!(
            insights.summary,
            "Based on 0 user comments, Velvet Base is often described as having varied characteristics."
        );
        assert_eq!(insights.skin_type_scale, 0.5);
        assert_eq!(insights.skin_type_reading, SkinTypeReading::Combination);
        assert!(insights.tags.is_empty());
        assert!(insights.top_facts.is_empty());
        assert_eq!(insights.positive_share, 0.0);
    }

    #[test]
    fn test_build_insights_unknown_key_is_data_integrity() {
        let map = agg(&[("finish_glitter", 1, 1.0)]);
        let err = build_insights(&vocab(), product("Base"), &map, 1).unwrap_err();
        assert!(matches!(err, AppError::DataIntegrity(_)));
    }

    #[tokio::test]
    async fn test_load_insights_unknown_product() {
        let store = MemoryStore::new();
        let err = load_insights(&store, &vocab(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_load_insights_reads_stored_aggregates() {
        let store = MemoryStore::new();
        let vocabulary = vocab();
        let base = store.insert_product("Base", None, "foundation").await;
        for text in [
            "Great for oily skin, matte finish, lasts all day",
            "Too drying for my dry skin",
            "Perfect for combination skin, dewy look",
        ] {
            crate::comments::pipeline::create_comment(
                &store,
                &vocabulary,
                crate::store::NewComment {
                    product_id: base.id,
                    text: text.to_string(),
                    skin_type: None,
                    source: None,
                    source_url: None,
                },
            )
            .await
            .unwrap();
        }

        let insights = load_insights(&store, &vocabulary, base.id).await.unwrap();
        assert_eq!(insights.comment_count, 3);
        assert!((insights.skin_type_scale - 0.5).abs() < 1e-12);
        assert_eq!(insights.skin_type_reading, SkinTypeReading::Combination);
        assert!(insights
            .tags
            .iter()
            .any(|t| t.key == "skin_type_dry" && t.count == 1));
    }
}
