use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comments::pipeline::reaggregate_product;
use crate::errors::AppError;
use crate::models::product::ProductRow;
use crate::products::insights::{load_insights, ProductInsights};
use crate::state::AppState;
use crate::store::ProductFilter;
use crate::tags::metrics::SUMMARY_MIN_CONFIDENCE;
use crate::tags::{AggregateMap, TagCategory, TagVocabulary};

#[derive(Deserialize, Default)]
pub struct ProductListParams {
    pub skin_type: Option<String>,
    pub finish: Option<String>,
    pub coverage: Option<String>,
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductRow>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct ReaggregateResponse {
    pub product_id: Uuid,
    pub tags: AggregateMap,
}

/// Turns a short filter value (`oily`, `matte`, `full`) into its tag key,
/// e.g. `skin_type_oily`. Values already carrying the prefix pass through.
fn filter_key(
    vocabulary: &TagVocabulary,
    category: TagCategory,
    value: &str,
) -> Result<String, AppError> {
    let value = value.trim().to_lowercase().replace('-', "_");
    let prefix = format!("{}_", category.as_str());
    let key = if value.starts_with(&prefix) {
        value
    } else {
        format!("{prefix}{value}")
    };

    match vocabulary.get(&key) {
        Some(definition) if definition.category == category => Ok(key),
        _ => Err(AppError::Validation(format!(
            "unknown {} filter '{key}'",
            category.as_str()
        ))),
    }
}

pub fn build_filter(
    vocabulary: &TagVocabulary,
    params: &ProductListParams,
) -> Result<ProductFilter, AppError> {
    let requested = [
        (TagCategory::SkinType, &params.skin_type),
        (TagCategory::Finish, &params.finish),
        (TagCategory::Coverage, &params.coverage),
    ];

    let mut tag_keys = Vec::new();
    for (category, value) in requested {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            tag_keys.push(filter_key(vocabulary, category, value)?);
        }
    }

    Ok(ProductFilter {
        tag_keys,
        min_confidence: SUMMARY_MIN_CONFIDENCE,
        category: params.category.clone().filter(|c| !c.trim().is_empty()),
    })
}

/// GET /api/v1/products
pub async fn handle_list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<ProductListResponse>, AppError> {
    let filter = build_filter(&state.vocabulary, &params)?;
    let products = state.store.list_products(&filter).await?;
    Ok(Json(ProductListResponse {
        total: products.len(),
        products,
    }))
}

/// GET /api/v1/products/:id/insights
pub async fn handle_get_insights(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductInsights>, AppError> {
    let insights = load_insights(state.store.as_ref(), &state.vocabulary, id).await?;
    Ok(Json(insights))
}

/// POST /api/v1/products/:id/reaggregate
pub async fn handle_reaggregate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReaggregateResponse>, AppError> {
    if state.store.get_product(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Product {id} not found")));
    }
    let tags = reaggregate_product(state.store.as_ref(), id).await?;
    Ok(Json(ReaggregateResponse {
        product_id: id,
        tags,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> TagVocabulary {
        TagVocabulary::builtin().unwrap()
    }

    #[test]
    fn test_build_filter_maps_short_values() {
        let params = ProductListParams {
            skin_type: Some("oily".into()),
            finish: Some("Matte".into()),
            coverage: Some("coverage_full".into()),
            category: Some("foundation".into()),
        };
        let filter = build_filter(&vocab(), &params).unwrap();
        assert_eq!(
            filter.tag_keys,
            vec!["skin_type_oily", "finish_matte", "coverage_full"]
        );
        assert_eq!(filter.min_confidence, 0.3);
        assert_eq!(filter.category.as_deref(), Some("foundation"));
    }

    #[test]
    fn test_build_filter_without_params_is_open() {
        let filter = build_filter(&vocab(), &ProductListParams::default()).unwrap();
        assert!(filter.tag_keys.is_empty());
        assert!(filter.category.is_none());
    }

    #[test]
    fn test_build_filter_rejects_unknown_value() {
        let params = ProductListParams {
            finish: Some("glitter".into()),
            ..Default::default()
        };
        assert!(matches!(
            build_filter(&vocab(), &params),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_build_filter_rejects_cross_category_key() {
        let params = ProductListParams {
            skin_type: Some("finish_matte".into()),
            ..Default::default()
        };
        assert!(build_filter(&vocab(), &params).is_err());
    }
}
