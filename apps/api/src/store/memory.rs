use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::comment::{CommentRow, CommentWithTags};
use crate::models::product::ProductRow;
use crate::store::{
    CommentPage, CommentPatch, CommentQuery, InsightStore, NewComment, ProductFilter,
    DEFAULT_SOURCE,
};
use crate::tags::{aggregate, AggregateMap, TagSet};

#[derive(Default)]
struct MemoryState {
    products: HashMap<Uuid, ProductRow>,
    comments: HashMap<Uuid, CommentRow>,
    comment_tags: HashMap<Uuid, TagSet>,
    product_tags: HashMap<Uuid, AggregateMap>,
}

impl MemoryState {
    fn with_tags(&self, comment: &CommentRow) -> CommentWithTags {
        CommentWithTags {
            comment: comment.clone(),
            tags: self
                .comment_tags
                .get(&comment.id)
                .map(|t| t.iter().cloned().collect())
                .unwrap_or_default(),
        }
    }

    /// Replaces the product's aggregate entry from its current comments.
    fn reaggregate(&mut self, product_id: Uuid) -> AggregateMap {
        let empty = TagSet::new();
        let aggregates = aggregate(
            self.comments
                .values()
                .filter(|c| c.product_id == product_id)
                .map(|c| self.comment_tags.get(&c.id).unwrap_or(&empty)),
        );

        if aggregates.is_empty() {
            self.product_tags.remove(&product_id);
        } else {
            self.product_tags.insert(product_id, aggregates.clone());
        }
        aggregates
    }
}

/// In-process store. All state sits behind one `RwLock`, so every write and
/// the re-aggregation it triggers form one critical section.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Products have no write API; they are inserted directly by seeding and tests.
    pub async fn insert_product(
        &self,
        name: &str,
        brand: Option<&str>,
        category: &str,
    ) -> ProductRow {
        let product = ProductRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            brand: brand.map(String::from),
            category: category.to_string(),
            published: true,
            created_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .products
            .insert(product.id, product.clone());
        product
    }
}

#[async_trait]
impl InsightStore for MemoryStore {
    async fn get_product(&self, id: Uuid) -> Result<Option<ProductRow>, AppError> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductRow>, AppError> {
        let state = self.state.read().await;
        let mut products: Vec<ProductRow> = state
            .products
            .values()
            .filter(|p| p.published)
            .filter(|p| filter.category.as_ref().map_or(true, |c| &p.category == c))
            .filter(|p| {
                filter.tag_keys.is_empty()
                    || state.product_tags.get(&p.id).is_some_and(|aggs| {
                        filter.tag_keys.iter().any(|k| {
                            aggs.get(k)
                                .is_some_and(|a| a.confidence >= filter.min_confidence)
                        })
                    })
            })
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn create_comment(
        &self,
        comment: &NewComment,
        tags: &TagSet,
    ) -> Result<CommentWithTags, AppError> {
        let mut state = self.state.write().await;
        if !state.products.contains_key(&comment.product_id) {
            return Err(AppError::NotFound(format!(
                "Product {} not found",
                comment.product_id
            )));
        }

        let now = Utc::now();
        let row = CommentRow {
            id: Uuid::new_v4(),
            product_id: comment.product_id,
            text: comment.text.clone(),
            skin_type: comment.skin_type.map(|s| s.as_str().to_string()),
            source: comment
                .source
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            source_url: comment.source_url.clone(),
            processed: true,
            created_at: now,
            updated_at: now,
        };
        state.comment_tags.insert(row.id, tags.clone());
        state.comments.insert(row.id, row.clone());
        state.reaggregate(row.product_id);
        Ok(state.with_tags(&row))
    }

    async fn get_comment(&self, id: Uuid) -> Result<Option<CommentWithTags>, AppError> {
        let state = self.state.read().await;
        Ok(state.comments.get(&id).map(|c| state.with_tags(c)))
    }

    async fn list_comments(&self, query: &CommentQuery) -> Result<CommentPage, AppError> {
        let state = self.state.read().await;
        let mut matching: Vec<&CommentRow> = state
            .comments
            .values()
            .filter(|c| query.product_id.map_or(true, |p| c.product_id == p))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let total = matching.len() as i64;
        let comments = matching
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .map(|c| state.with_tags(c))
            .collect();
        Ok(CommentPage { comments, total })
    }

    async fn update_comment(
        &self,
        id: Uuid,
        patch: &CommentPatch,
        tags: Option<&TagSet>,
    ) -> Result<Option<CommentWithTags>, AppError> {
        let mut state = self.state.write().await;
        let Some(row) = state.comments.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(text) = &patch.text {
            row.text = text.clone();
        }
        if let Some(skin_type) = patch.skin_type {
            row.skin_type = Some(skin_type.as_str().to_string());
        }
        if let Some(source) = &patch.source {
            row.source = source.clone();
        }
        if let Some(source_url) = &patch.source_url {
            row.source_url = Some(source_url.clone());
        }
        row.updated_at = Utc::now();
        let row = row.clone();

        if let Some(tags) = tags {
            state.comment_tags.insert(id, tags.clone());
            state.reaggregate(row.product_id);
        }
        Ok(Some(state.with_tags(&row)))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<Option<CommentRow>, AppError> {
        let mut state = self.state.write().await;
        state.comment_tags.remove(&id);
        let removed = state.comments.remove(&id);
        if let Some(row) = &removed {
            state.reaggregate(row.product_id);
        }
        Ok(removed)
    }

    async fn count_comments(&self, product_id: Uuid) -> Result<usize, AppError> {
        let state = self.state.read().await;
        Ok(state
            .comments
            .values()
            .filter(|c| c.product_id == product_id)
            .count())
    }

    async fn product_aggregates(&self, product_id: Uuid) -> Result<AggregateMap, AppError> {
        let state = self.state.read().await;
        Ok(state
            .product_tags
            .get(&product_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn reaggregate(&self, product_id: Uuid) -> Result<AggregateMap, AppError> {
        Ok(self.state.write().await.reaggregate(product_id))
    }
}
