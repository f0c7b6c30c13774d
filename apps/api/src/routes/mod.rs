pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::comments::handlers as comments;
use crate::products::handlers as products;
use crate::state::AppState;
use crate::tags::handlers as tags;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Vocabulary
        .route("/api/v1/tags", get(tags::handle_list_tags))
        .route("/api/v1/tags/extract", post(tags::handle_extract_preview))
        // Comments
        .route(
            "/api/v1/comments",
            get(comments::handle_list_comments).post(comments::handle_create_comment),
        )
        .route(
            "/api/v1/comments/:id",
            get(comments::handle_get_comment)
                .patch(comments::handle_update_comment)
                .delete(comments::handle_delete_comment),
        )
        // Products
        .route("/api/v1/products", get(products::handle_list_products))
        .route(
            "/api/v1/products/:id/insights",
            get(products::handle_get_insights),
        )
        .route(
            "/api/v1/products/:id/reaggregate",
            post(products::handle_reaggregate),
        )
        .with_state(state)
}
