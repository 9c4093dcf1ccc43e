use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::feedback::validation::validate_submission;
use crate::models::review::{NewReview, ReviewRow, ReviewStats};
use crate::state::AppState;

/// Body returned to the customer after a submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewSubmittedResponse {
    pub review_id: i64,
    pub user_rating: i32,
    pub user_review: String,
    pub ai_response: String,
    pub created_at: DateTime<Utc>,
}

/// One row of the admin dashboard. Missing AI texts render as empty strings.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminReview {
    pub review_id: i64,
    pub user_rating: i32,
    pub user_review: String,
    pub ai_summary: String,
    pub recommended_actions: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for AdminReview {
    fn from(row: ReviewRow) -> Self {
        Self {
            review_id: row.id,
            user_rating: row.user_rating,
            user_review: row.user_review,
            ai_summary: row.ai_summary.unwrap_or_default(),
            recommended_actions: row.recommended_actions.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminReviewList {
    pub reviews: Vec<AdminReview>,
}

/// POST /api/reviews
pub async fn handle_submit_review(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ReviewSubmittedResponse>), AppError> {
    let submission = validate_submission(&body)?;

    let feedback = state
        .feedback
        .generate_all(submission.user_rating, &submission.user_review)
        .await;

    let row = state
        .store
        .insert(NewReview {
            user_rating: submission.user_rating,
            user_review: submission.user_review,
            ai_response: Some(feedback.user_response),
            ai_summary: Some(feedback.summary),
            recommended_actions: Some(feedback.recommended_actions),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReviewSubmittedResponse {
            review_id: row.id,
            user_rating: row.user_rating,
            user_review: row.user_review,
            ai_response: row.ai_response.unwrap_or_default(),
            created_at: row.created_at,
        }),
    ))
}

/// GET /api/admin/reviews
pub async fn handle_list_reviews(
    State(state): State<AppState>,
) -> Result<Json<AdminReviewList>, AppError> {
    let rows = state.store.list_newest_first().await?;
    Ok(Json(AdminReviewList {
        reviews: rows.into_iter().map(AdminReview::from).collect(),
    }))
}

/// GET /api/admin/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<ReviewStats>, AppError> {
    Ok(Json(state.store.stats().await?))
}
