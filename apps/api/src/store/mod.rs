//! Storage collaborator for comments, their tag associations and product aggregates.
//!
//! `AppState` holds an `Arc<dyn InsightStore>`; `PgStore` is the production
//! backend and `MemoryStore` serves local runs and tests.

pub mod memory;
pub mod postgres;
pub mod seed;

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::comment::{CommentRow, CommentWithTags, SkinType};
use crate::models::product::ProductRow;
use crate::tags::{AggregateMap, TagSet};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub const DEFAULT_SOURCE: &str = "manual";

#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub product_id: Uuid,
    pub text: String,
    pub skin_type: Option<SkinType>,
    pub source: Option<String>,
    pub source_url: Option<String>,
}

/// Partial comment update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentPatch {
    pub text: Option<String>,
    pub skin_type: Option<SkinType>,
    pub source: Option<String>,
    pub source_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CommentQuery {
    pub product_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone)]
pub struct CommentPage {
    pub comments: Vec<CommentWithTags>,
    pub total: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Products must carry at least one of these tags at `min_confidence` or above.
    /// Empty means no tag filter.
    pub tag_keys: Vec<String>,
    pub min_confidence: f64,
    pub category: Option<String>,
}

#[async_trait]
pub trait InsightStore: Send + Sync {
    async fn get_product(&self, id: Uuid) -> Result<Option<ProductRow>, AppError>;

    /// Published products matching the filter, ordered by name.
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductRow>, AppError>;

    /// Inserts the comment and its tag associations, marks it processed and
    /// re-aggregates the product, all as one unit.
    async fn create_comment(
        &self,
        comment: &NewComment,
        tags: &TagSet,
    ) -> Result<CommentWithTags, AppError>;

    async fn get_comment(&self, id: Uuid) -> Result<Option<CommentWithTags>, AppError>;

    /// Newest first.
    async fn list_comments(&self, query: &CommentQuery) -> Result<CommentPage, AppError>;

    /// Applies the patch. When `tags` is given the comment's associations are
    /// replaced and the product re-aggregated in the same unit.
    async fn update_comment(
        &self,
        id: Uuid,
        patch: &CommentPatch,
        tags: Option<&TagSet>,
    ) -> Result<Option<CommentWithTags>, AppError>;

    /// Removes the comment with its associations, re-aggregates its product in
    /// the same unit and returns the removed row.
    async fn delete_comment(&self, id: Uuid) -> Result<Option<CommentRow>, AppError>;

    async fn count_comments(&self, product_id: Uuid) -> Result<usize, AppError>;

    /// The aggregate rows currently stored for the product.
    async fn product_aggregates(&self, product_id: Uuid) -> Result<AggregateMap, AppError>;

    /// Reads every comment tag set of the product, aggregates them and replaces
    /// all stored aggregate rows. Runs serialized per product so concurrent
    /// writers never interleave their read and replace steps. Writes already
    /// do this; calling it directly is the repair path.
    async fn reaggregate(&self, product_id: Uuid) -> Result<AggregateMap, AppError>;
}
