use serde_json::Value;

use crate::errors::AppError;

pub const MAX_REVIEW_CHARS: usize = 5000;

/// A review submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSubmission {
    pub user_rating: i32,
    pub user_review: String,
}

/// Validates a raw `POST /api/reviews` body.
///
/// Checks run in a fixed order and the first failure is reported.
pub fn validate_submission(body: &[u8]) -> Result<ReviewSubmission, AppError> {
    let invalid = |msg: &str| AppError::Validation(msg.to_string());

    let data = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => map,
        _ => return Err(invalid("Request body must be JSON")),
    };

    let user_rating = match data.get("user_rating") {
        None | Some(Value::Null) => return Err(invalid("user_rating is required")),
        Some(value) => value
            .as_i64()
            .ok_or_else(|| invalid("user_rating must be an integer"))?,
    };
    if !(1..=5).contains(&user_rating) {
        return Err(invalid("user_rating must be between 1 and 5"));
    }

    let user_review = match data.get("user_review") {
        None => "",
        Some(value) => value
            .as_str()
            .ok_or_else(|| invalid("user_review must be a string"))?,
    };
    if user_review.trim().is_empty() {
        return Err(invalid("user_review cannot be empty"));
    }
    if user_review.chars().count() > MAX_REVIEW_CHARS {
        return Err(invalid("user_review is too long (maximum 5000 characters)"));
    }

    Ok(ReviewSubmission {
        user_rating: user_rating as i32,
        user_review: user_review.to_string(),
    })
}
