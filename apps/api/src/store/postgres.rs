use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::comment::{CommentRow, CommentWithTags};
use crate::models::product::{ProductRow, ProductTagRow};
use crate::store::{
    CommentPage, CommentPatch, CommentQuery, InsightStore, NewComment, ProductFilter,
    DEFAULT_SOURCE,
};
use crate::tags::{aggregate, AggregateMap, TagAggregate, TagSet};

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn tags_for(&self, comment_id: Uuid) -> Result<Vec<String>, AppError> {
        Ok(sqlx::query_scalar::<_, String>(
            "SELECT tag_key FROM comment_tags WHERE comment_id = $1 ORDER BY tag_key",
        )
        .bind(comment_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn attach_tags(&self, rows: Vec<CommentRow>) -> Result<Vec<CommentWithTags>, AppError> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let pairs: Vec<(Uuid, String)> = sqlx::query_as(
            "SELECT comment_id, tag_key FROM comment_tags WHERE comment_id = ANY($1) ORDER BY tag_key",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_comment: HashMap<Uuid, Vec<String>> = HashMap::new();
        for (comment_id, tag_key) in pairs {
            by_comment.entry(comment_id).or_default().push(tag_key);
        }

        Ok(rows
            .into_iter()
            .map(|comment| CommentWithTags {
                tags: by_comment.remove(&comment.id).unwrap_or_default(),
                comment,
            })
            .collect())
    }
}

/// Replaces the tag associations of one comment inside `tx`.
async fn replace_comment_tags(
    tx: &mut Transaction<'_, Postgres>,
    comment_id: Uuid,
    tags: &TagSet,
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM comment_tags WHERE comment_id = $1")
        .bind(comment_id)
        .execute(&mut **tx)
        .await?;

    let keys: Vec<String> = tags.iter().cloned().collect();
    sqlx::query(
        "INSERT INTO comment_tags (comment_id, tag_key) SELECT $1, UNNEST($2::text[])",
    )
    .bind(comment_id)
    .bind(&keys)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Recomputes the product's aggregate rows inside `tx` from every comment
/// tag set visible to it. Holds a per-product advisory lock until `tx` ends,
/// so concurrent writers for one product replace the rows one after another.
async fn replace_aggregates(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
) -> Result<AggregateMap, AppError> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
        .bind(product_id.to_string())
        .execute(&mut **tx)
        .await?;

    let pairs: Vec<(Uuid, Option<String>)> = sqlx::query_as(
        r#"
        SELECT c.id, ct.tag_key
        FROM comments c
        LEFT JOIN comment_tags ct ON ct.comment_id = c.id
        WHERE c.product_id = $1
        "#,
    )
    .bind(product_id)
    .fetch_all(&mut **tx)
    .await?;

    let mut tag_sets: HashMap<Uuid, TagSet> = HashMap::new();
    for (comment_id, tag_key) in pairs {
        let set = tag_sets.entry(comment_id).or_default();
        if let Some(key) = tag_key {
            set.insert(key);
        }
    }
    let aggregates = aggregate(tag_sets.values());

    sqlx::query("DELETE FROM product_tags WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

    let keys: Vec<String> = aggregates.keys().cloned().collect();
    let counts = aggregates
        .iter()
        .map(|(key, a)| count_column(product_id, key, a.count))
        .collect::<Result<Vec<i32>, AppError>>()?;
    let confidences: Vec<f64> = aggregates.values().map(|a| a.confidence).collect();
    sqlx::query(
        r#"
        INSERT INTO product_tags (product_id, tag_key, count, confidence)
        SELECT $1, t.tag_key, t.count, t.confidence
        FROM UNNEST($2::text[], $3::int4[], $4::float8[]) AS t(tag_key, count, confidence)
        "#,
    )
    .bind(product_id)
    .bind(&keys)
    .bind(&counts)
    .bind(&confidences)
    .execute(&mut **tx)
    .await?;

    info!(
        "Re-aggregated product {product_id}: {} comments, {} tags",
        tag_sets.len(),
        aggregates.len()
    );
    Ok(aggregates)
}

/// `product_tags.count` is INTEGER; larger counts are refused, not truncated.
fn count_column(product_id: Uuid, tag_key: &str, count: u32) -> Result<i32, AppError> {
    i32::try_from(count).map_err(|_| {
        AppError::DataIntegrity(format!(
            "count {count} for product {product_id} tag {tag_key} exceeds column range"
        ))
    })
}

fn to_aggregate(row: &ProductTagRow) -> Result<TagAggregate, AppError> {
    let count = u32::try_from(row.count).map_err(|_| {
        AppError::DataIntegrity(format!(
            "negative count {} for product {} tag {}",
            row.count, row.product_id, row.tag_key
        ))
    })?;
    Ok(TagAggregate {
        count,
        confidence: row.confidence,
    })
}

#[async_trait]
impl InsightStore for PgStore {
    async fn get_product(&self, id: Uuid) -> Result<Option<ProductRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductRow>, AppError> {
        Ok(sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT p.*
            FROM products p
            WHERE p.published
              AND ($1::text IS NULL OR p.category = $1)
              AND (
                cardinality($2::text[]) = 0
                OR EXISTS (
                    SELECT 1 FROM product_tags pt
                    WHERE pt.product_id = p.id
                      AND pt.tag_key = ANY($2)
                      AND pt.confidence >= $3
                )
              )
            ORDER BY p.name, p.id
            "#,
        )
        .bind(filter.category.as_deref())
        .bind(&filter.tag_keys)
        .bind(filter.min_confidence)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_comment(
        &self,
        comment: &NewComment,
        tags: &TagSet,
    ) -> Result<CommentWithTags, AppError> {
        let mut tx = self.pool.begin().await?;

        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO comments (id, product_id, text, skin_type, source, source_url, processed)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE)
            "#,
        )
        .bind(id)
        .bind(comment.product_id)
        .bind(&comment.text)
        .bind(comment.skin_type.map(|s| s.as_str()))
        .bind(comment.source.as_deref().unwrap_or(DEFAULT_SOURCE))
        .bind(comment.source_url.as_deref())
        .execute(&mut *tx)
        .await?;

        replace_comment_tags(&mut tx, id, tags).await?;

        let row = sqlx::query_as::<_, CommentRow>(
            "UPDATE comments SET processed = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        replace_aggregates(&mut tx, comment.product_id).await?;
        tx.commit().await?;

        Ok(CommentWithTags {
            comment: row,
            tags: tags.iter().cloned().collect(),
        })
    }

    async fn get_comment(&self, id: Uuid) -> Result<Option<CommentWithTags>, AppError> {
        let row = sqlx::query_as::<_, CommentRow>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(comment) => {
                let tags = self.tags_for(comment.id).await?;
                Ok(Some(CommentWithTags { comment, tags }))
            }
            None => Ok(None),
        }
    }

    async fn list_comments(&self, query: &CommentQuery) -> Result<CommentPage, AppError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT * FROM comments
            WHERE ($1::uuid IS NULL OR product_id = $1)
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query.product_id)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE ($1::uuid IS NULL OR product_id = $1)",
        )
        .bind(query.product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(CommentPage {
            comments: self.attach_tags(rows).await?,
            total,
        })
    }

    async fn update_comment(
        &self,
        id: Uuid,
        patch: &CommentPatch,
        tags: Option<&TagSet>,
    ) -> Result<Option<CommentWithTags>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments SET
                text = COALESCE($2, text),
                skin_type = COALESCE($3, skin_type),
                source = COALESCE($4, source),
                source_url = COALESCE($5, source_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.text.as_deref())
        .bind(patch.skin_type.map(|s| s.as_str()))
        .bind(patch.source.as_deref())
        .bind(patch.source_url.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        if let Some(tags) = tags {
            replace_comment_tags(&mut tx, id, tags).await?;
            replace_aggregates(&mut tx, row.product_id).await?;
        }
        tx.commit().await?;

        let tags = self.tags_for(id).await?;
        Ok(Some(CommentWithTags { comment: row, tags }))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<Option<CommentRow>, AppError> {
        let mut tx = self.pool.begin().await?;

        // comment_tags rows go with the comment (ON DELETE CASCADE)
        let removed =
            sqlx::query_as::<_, CommentRow>("DELETE FROM comments WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if let Some(row) = &removed {
            replace_aggregates(&mut tx, row.product_id).await?;
        }
        tx.commit().await?;
        Ok(removed)
    }

    async fn count_comments(&self, product_id: Uuid) -> Result<usize, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE product_id = $1")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }

    async fn product_aggregates(&self, product_id: Uuid) -> Result<AggregateMap, AppError> {
        let rows = sqlx::query_as::<_, ProductTagRow>(
            "SELECT * FROM product_tags WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Ok((row.tag_key.clone(), to_aggregate(row)?)))
            .collect()
    }

    async fn reaggregate(&self, product_id: Uuid) -> Result<AggregateMap, AppError> {
        let mut tx = self.pool.begin().await?;
        let aggregates = replace_aggregates(&mut tx, product_id).await?;
        tx.commit().await?;
        Ok(aggregates)
    }
}
