// Prompt templates for the review feedback service.
// Replace `{user_rating}` first and `{user_review}` last.

pub const USER_RESPONSE_PROMPT_TEMPLATE: &str = r#"You are a customer service representative replying to a customer review.

Customer rating: {user_rating} out of 5 stars
Customer review: {user_review}

Write a warm, professional reply of 4 to 6 sentences that:
1. Refers to the specific points the customer raised
2. Thanks them for taking the time to write
3. Addresses their concerns or celebrates what went well
4. Shows their feedback will be used to improve

Match the tone to the rating: grateful and inviting for 4-5 stars, appreciative and improvement-minded for 3 stars, apologetic and concrete about fixes for 1-2 stars.
Reply with the message text only."#;

pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Summarise this customer review for an internal admin dashboard.

Customer rating: {user_rating} out of 5 stars
Customer review: {user_review}

Write 3 to 5 sentences covering the overall sentiment, the specific positives, the specific complaints, notable details about staff, product or service, and how satisfied the customer seems overall. Use neutral business language."#;

pub const RECOMMENDED_ACTIONS_PROMPT_TEMPLATE: &str = r#"You advise a business on how to act on customer feedback.

Customer rating: {user_rating} out of 5 stars
Customer review: {user_review}

List 4 to 6 specific, actionable recommendations as bullet points, each with a short explanation. Cover both immediate steps and longer-term improvements.
For 1-2 stars focus on recovering the customer and fixing root causes; for 3 stars on the clearest improvement opportunities; for 4-5 stars on sustaining what works and building on it."#;

/// Fills a feedback template. The review goes in last so text inside it is never substituted.
pub fn render(template: &str, user_rating: i32, user_review: &str) -> String {
    template
        .replace("{user_rating}", &user_rating.to_string())
        .replace("{user_review}", user_review)
}
