//! Comment write pipeline: validate → extract → persist.
//!
//! The store re-aggregates the product inside the same unit as every write
//! that changes its tag evidence, so a failed re-aggregation rolls the write
//! back and an error response never leaves a stored comment behind.
//! Aggregates are never patched in place.

use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::comment::CommentWithTags;
use crate::store::{CommentPatch, InsightStore, NewComment};
use crate::tags::{extract, AggregateMap, TagSet, TagVocabulary};

fn validate_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    Ok(())
}

fn extract_logged(vocabulary: &TagVocabulary, text: &str) -> TagSet {
    let tags = extract(vocabulary, text);
    debug!("extracted tags {:?}", tags);
    tags
}

pub async fn create_comment(
    store: &dyn InsightStore,
    vocabulary: &TagVocabulary,
    comment: NewComment,
) -> Result<CommentWithTags, AppError> {
    validate_text(&comment.text)?;

    if store.get_product(comment.product_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Product {} not found",
            comment.product_id
        )));
    }

    let tags = extract_logged(vocabulary, &comment.text);
    let created = store.create_comment(&comment, &tags).await?;
    info!(
        "Created comment {} for product {} with {} tags",
        created.comment.id,
        created.comment.product_id,
        created.tags.len()
    );
    Ok(created)
}

/// Applies a partial update. A text change re-extracts tags and re-aggregates
/// the owning product; other fields do not touch tag evidence.
pub async fn update_comment(
    store: &dyn InsightStore,
    vocabulary: &TagVocabulary,
    id: Uuid,
    patch: CommentPatch,
) -> Result<CommentWithTags, AppError> {
    let tags = match &patch.text {
        Some(text) => {
            validate_text(text)?;
            Some(extract_logged(vocabulary, text))
        }
        None => None,
    };

    let updated = store
        .update_comment(id, &patch, tags.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment {id} not found")))?;

    if tags.is_some() {
        info!("Re-tagged comment {id} after text edit");
    }
    Ok(updated)
}

pub async fn delete_comment(store: &dyn InsightStore, id: Uuid) -> Result<(), AppError> {
    let removed = store
        .delete_comment(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment {id} not found")))?;

    info!("Deleted comment {id} of product {}", removed.product_id);
    Ok(())
}

/// Forced recomputation, the repair path for drifted aggregates.
pub async fn reaggregate_product(
    store: &dyn InsightStore,
    product_id: Uuid,
) -> Result<AggregateMap, AppError> {
    let aggregates = store.reaggregate(product_id).await?;
    debug!("Product {product_id} now carries {} tags", aggregates.len());
    Ok(aggregates)
}
