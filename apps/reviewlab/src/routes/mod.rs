pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/reviews", post(handlers::handle_submit_review))
        .route("/api/admin/reviews", get(handlers::handle_list_reviews))
        .route("/api/admin/stats", get(handlers::handle_stats))
        .with_state(state)
}
