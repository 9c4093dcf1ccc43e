// Prompt templates for star-rating classification.
// Every template substitutes `{review_text}` once and asks for the same JSON shape.

use clap::ValueEnum;
use serde::Serialize;

/// Output contract shared by every strategy.
const JSON_CONTRACT: &str = r#"Respond with a single JSON object and nothing else:
{
  "predicted_stars": <integer from 1 to 5>,
  "explanation": "<one or two sentences>"
}"#;

pub const DIRECT_PROMPT_TEMPLATE: &str = r#"Classify the following customer review into a star rating from 1 to 5.

Review: {review_text}

{json_contract}"#;

pub const FEW_SHOT_PROMPT_TEMPLATE: &str = r#"You rate customer reviews on a 1 to 5 star scale. Study these labelled examples first.

Example 1
Review: "Cold food, rude staff, and we waited forty minutes. Not coming back."
predicted_stars: 1
explanation: Every aspect mentioned (food, service, wait) is negative.

Example 2
Review: "Decent pasta, nothing memorable. Service was fine."
predicted_stars: 3
explanation: Neutral on food and service with no strong feelings either way.

Example 3
Review: "Fantastic meal and the staff went out of their way for us. Highly recommend!"
predicted_stars: 5
explanation: Enthusiastic praise across food and service with a recommendation.

Now rate this review.
Review: {review_text}

{json_contract}"#;

pub const CHAIN_OF_THOUGHT_PROMPT_TEMPLATE: &str = r#"Determine the star rating (1 to 5) of the customer review below by reasoning step by step.

Review: {review_text}

Step 1: List the positive points the reviewer makes.
Step 2: List the negative points the reviewer makes.
Step 3: Judge the overall sentiment: very negative, negative, neutral, positive or very positive.
Step 4: Map that sentiment to stars (very negative = 1, negative = 2, neutral = 3, positive = 4, very positive = 5).
Step 5: Summarise your reasoning in the explanation field.

{json_contract}"#;

/// Prompt-construction strategy compared by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Direct,
    FewShot,
    ChainOfThought,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Direct,
        Strategy::FewShot,
        Strategy::ChainOfThought,
    ];

    /// Human-readable approach name used in reports.
    pub fn approach_name(self) -> &'static str {
        match self {
            Strategy::Direct => "Direct Classification",
            Strategy::FewShot => "Few-Shot Learning",
            Strategy::ChainOfThought => "Chain-of-Thought",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Strategy::Direct => DIRECT_PROMPT_TEMPLATE,
            Strategy::FewShot => FEW_SHOT_PROMPT_TEMPLATE,
            Strategy::ChainOfThought => CHAIN_OF_THOUGHT_PROMPT_TEMPLATE,
        }
    }
}

/// Builds the classification prompt for `review_text` under `strategy`.
///
/// The contract is filled in before the review so that braces or placeholder
/// lookalikes inside the review are never substituted.
pub fn build_prompt(strategy: Strategy, review_text: &str) -> String {
    let (head, tail) = strategy
        .template()
        .split_once("{review_text}")
        .unwrap_or((strategy.template(), ""));
    let tail = tail.replace("{json_contract}", JSON_CONTRACT);
    format!("{head}{review_text}{tail}")
}
