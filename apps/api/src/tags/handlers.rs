use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::tags::extractor::{find_matches, TagMatch};
use crate::tags::{TagCategory, TagDefinition, TagSet};

#[derive(Deserialize)]
pub struct TagListParams {
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct TagListResponse {
    pub tags: Vec<TagDefinition>,
    pub total: usize,
}

#[derive(Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct ExtractResponse {
    pub tags: TagSet,
    pub matches: Vec<TagMatch>,
}

/// GET /api/v1/tags
pub async fn handle_list_tags(
    State(state): State<AppState>,
    Query(params): Query<TagListParams>,
) -> Result<Json<TagListResponse>, AppError> {
    let tags: Vec<TagDefinition> = match params.category.as_deref() {
        Some(category) => {
            let category: TagCategory = category.parse()?;
            state
                .vocabulary
                .list_by_category(category)
                .into_iter()
                .cloned()
                .collect()
        }
        None => state.vocabulary.all().to_vec(),
    };

    Ok(Json(TagListResponse {
        total: tags.len(),
        tags,
    }))
}

/// POST /api/v1/tags/extract
/// Runs the extractor on arbitrary text without storing anything.
pub async fn handle_extract_preview(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let matches = find_matches(&state.vocabulary, &req.text);
    let tags: TagSet = matches.iter().map(|m| m.key.clone()).collect();
    Ok(Json(ExtractResponse { tags, matches }))
}
