//! Feedback Service — generates the reply, summary and action list stored
//! with every submitted review.
//!
//! The oracle fails soft to `""`; blank output is replaced with canned text.

use std::sync::Arc;

use tracing::warn;

use crate::feedback::prompts::{
    render, RECOMMENDED_ACTIONS_PROMPT_TEMPLATE, SUMMARY_PROMPT_TEMPLATE,
    USER_RESPONSE_PROMPT_TEMPLATE,
};
use crate::llm_client::TextOracle;

const SUMMARY_EXCERPT_CHARS: usize = 100;

const NEGATIVE_ACTIONS: &str = "\
• Follow up with the customer promptly to address their concerns and offer a resolution
• Investigate the service issues described and put corrective measures in place
• Review staff training so the same problems do not recur
• Consider a sincere apology or appropriate compensation to rebuild trust
• Watch for similar feedback that would point to a systemic problem";

const NEUTRAL_ACTIONS: &str = "\
• Pin down the specific areas this customer felt could be better
• Compare with other reviews to see whether the same points come up
• Plan targeted improvements for the concerns raised
• Consider asking the customer for more detail on their experience
• Look for places where the experience could exceed expectations";

const POSITIVE_ACTIONS: &str = "\
• Thank the customer, publicly if appropriate and with their permission
• Share the feedback with the team to recognise good work
• With consent, consider using the review as a testimonial
• Identify what made this visit work well and keep it consistent
• Fold the practices praised here into training";

/// The three generated texts for one review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFeedback {
    pub user_response: String,
    pub summary: String,
    pub recommended_actions: String,
}

#[derive(Clone)]
pub struct FeedbackService {
    oracle: Arc<dyn TextOracle>,
}

impl FeedbackService {
    pub fn new(oracle: Arc<dyn TextOracle>) -> Self {
        Self { oracle }
    }

    pub async fn generate_user_response(&self, user_rating: i32, user_review: &str) -> String {
        let prompt = render(USER_RESPONSE_PROMPT_TEMPLATE, user_rating, user_review);
        self.complete_or(&prompt, "user response", || fallback_user_response(user_rating))
            .await
    }

    pub async fn generate_summary(&self, user_rating: i32, user_review: &str) -> String {
        let prompt = render(SUMMARY_PROMPT_TEMPLATE, user_rating, user_review);
        self.complete_or(&prompt, "summary", || fallback_summary(user_rating, user_review))
            .await
    }

    pub async fn generate_recommended_actions(&self, user_rating: i32, user_review: &str) -> String {
        let prompt = render(RECOMMENDED_ACTIONS_PROMPT_TEMPLATE, user_rating, user_review);
        self.complete_or(&prompt, "recommended actions", || {
            fallback_recommended_actions(user_rating).to_string()
        })
        .await
    }

    /// Generates all three texts, one oracle call after another.
    pub async fn generate_all(&self, user_rating: i32, user_review: &str) -> GeneratedFeedback {
        GeneratedFeedback {
            user_response: self.generate_user_response(user_rating, user_review).await,
            summary: self.generate_summary(user_rating, user_review).await,
            recommended_actions: self
                .generate_recommended_actions(user_rating, user_review)
                .await,
        }
    }

    async fn complete_or(
        &self,
        prompt: &str,
        what: &str,
        fallback: impl FnOnce() -> String,
    ) -> String {
        let text = self.oracle.complete(prompt).await;
        let text = text.trim();
        if text.is_empty() {
            warn!("No {what} generated, using fallback text");
            fallback()
        } else {
            text.to_string()
        }
    }
}

fn fallback_user_response(user_rating: i32) -> String {
    format!(
        "Thank you for your {user_rating}-star review. We appreciate your detailed feedback \
         and will use it to improve our service."
    )
}

fn fallback_summary(user_rating: i32, user_review: &str) -> String {
    let excerpt: String = user_review.chars().take(SUMMARY_EXCERPT_CHARS).collect();
    format!("{user_rating}-star review: {excerpt}...")
}

fn fallback_recommended_actions(user_rating: i32) -> &'static str {
    match user_rating {
        i32::MIN..=2 => NEGATIVE_ACTIONS,
        3 => NEUTRAL_ACTIONS,
        _ => POSITIVE_ACTIONS,
    }
}
