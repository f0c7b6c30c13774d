use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comments::pipeline;
use crate::errors::AppError;
use crate::models::comment::CommentWithTags;
use crate::state::AppState;
use crate::store::{CommentPatch, CommentQuery, NewComment};

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;

#[derive(Deserialize)]
pub struct ListCommentsParams {
    pub product_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<CommentWithTags>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// GET /api/v1/comments
pub async fn handle_list_comments(
    State(state): State<AppState>,
    Query(params): Query<ListCommentsParams>,
) -> Result<Json<CommentListResponse>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let page = state
        .store
        .list_comments(&CommentQuery {
            product_id: params.product_id,
            limit,
            offset,
        })
        .await?;

    Ok(Json(CommentListResponse {
        comments: page.comments,
        total: page.total,
        limit,
        offset,
    }))
}

/// POST /api/v1/comments
pub async fn handle_create_comment(
    State(state): State<AppState>,
    Json(req): Json<NewComment>,
) -> Result<(StatusCode, Json<CommentWithTags>), AppError> {
    let created = pipeline::create_comment(state.store.as_ref(), &state.vocabulary, req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/comments/:id
pub async fn handle_get_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CommentWithTags>, AppError> {
    let comment = state
        .store
        .get_comment(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment {id} not found")))?;
    Ok(Json(comment))
}

/// PATCH /api/v1/comments/:id
pub async fn handle_update_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<CommentPatch>,
) -> Result<Json<CommentWithTags>, AppError> {
    let updated =
        pipeline::update_comment(state.store.as_ref(), &state.vocabulary, id, patch).await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/comments/:id
pub async fn handle_delete_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    pipeline::delete_comment(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
