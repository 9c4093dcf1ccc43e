//! Review Store — single-table persistence behind a trait so the API runs
//! against PostgreSQL or, without a database, an in-process store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::AppError;
use crate::models::review::{NewReview, ReviewRow, ReviewStats};

/// Carried in `AppState` as `Arc<dyn ReviewStore>`.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert(&self, review: NewReview) -> Result<ReviewRow, AppError>;

    async fn list_newest_first(&self) -> Result<Vec<ReviewRow>, AppError>;

    async fn stats(&self) -> Result<ReviewStats, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn insert(&self, review: NewReview) -> Result<ReviewRow, AppError> {
        let row: ReviewRow = sqlx::query_as(
            r#"
            INSERT INTO reviews
                (user_rating, user_review, ai_response, ai_summary, recommended_actions)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(review.user_rating)
        .bind(&review.user_review)
        .bind(&review.ai_response)
        .bind(&review.ai_summary)
        .bind(&review.recommended_actions)
        .fetch_one(&self.pool)
        .await?;

        info!("Stored review {} ({} stars)", row.id, row.user_rating);
        Ok(row)
    }

    async fn list_newest_first(&self) -> Result<Vec<ReviewRow>, AppError> {
        let rows = sqlx::query_as("SELECT * FROM reviews ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn stats(&self) -> Result<ReviewStats, AppError> {
        let total_reviews: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
            .fetch_one(&self.pool)
            .await?;

        let counts: Vec<(i32, i64)> = sqlx::query_as(
            "SELECT user_rating, COUNT(*) FROM reviews GROUP BY user_rating ORDER BY user_rating",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ReviewStats {
            total_reviews,
            rating_distribution: counts
                .into_iter()
                .map(|(rating, count)| (rating.to_string(), count))
                .collect(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

/// Keeps reviews in process memory. Used when no `DATABASE_URL` is configured;
/// contents are lost on restart.
#[derive(Default)]
pub struct MemoryReviewStore {
    rows: RwLock<Vec<ReviewRow>>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn insert(&self, review: NewReview) -> Result<ReviewRow, AppError> {
        let mut rows = self.rows.write().await;
        let row = ReviewRow {
            id: rows.len() as i64 + 1,
            user_rating: review.user_rating,
            user_review: review.user_review,
            ai_response: review.ai_response,
            ai_summary: review.ai_summary,
            recommended_actions: review.recommended_actions,
            created_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list_newest_first(&self) -> Result<Vec<ReviewRow>, AppError> {
        let mut rows = self.rows.read().await.clone();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(rows)
    }

    async fn stats(&self) -> Result<ReviewStats, AppError> {
        let rows = self.rows.read().await;
        let mut stats = ReviewStats {
            total_reviews: rows.len() as i64,
            ..ReviewStats::default()
        };
        for row in rows.iter() {
            *stats
                .rating_distribution
                .entry(row.user_rating.to_string())
                .or_insert(0) += 1;
        }
        Ok(stats)
    }
}
