use std::sync::Arc;

use crate::config::Config;
use crate::store::InsightStore;
use crate::tags::TagVocabulary;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres in production, in-memory when no `DATABASE_URL` is configured.
    pub store: Arc<dyn InsightStore>,
    /// Immutable after startup.
    pub vocabulary: Arc<TagVocabulary>,
    pub config: Config,
}
