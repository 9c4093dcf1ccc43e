use std::sync::Arc;

use crate::feedback::service::FeedbackService;
use crate::feedback::store::ReviewStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL-backed, or in-memory when no database is configured.
    pub store: Arc<dyn ReviewStore>,
    pub feedback: FeedbackService,
}
