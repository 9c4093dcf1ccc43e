use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub user_rating: i32,
    pub user_review: String,
    pub ai_response: Option<String>,
    pub ai_summary: Option<String>,
    pub recommended_actions: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the `reviews` table; `id` and `created_at` are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_rating: i32,
    pub user_review: String,
    pub ai_response: Option<String>,
    pub ai_summary: Option<String>,
    pub recommended_actions: Option<String>,
}

/// Aggregates for the admin dashboard. Ratings with no reviews are omitted
/// from the distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total_reviews: i64,
    pub rating_distribution: BTreeMap<String, i64>,
}
