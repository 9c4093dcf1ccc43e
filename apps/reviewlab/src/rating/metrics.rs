//! Metrics Engine — accuracy, structural validity and cross-run consistency.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::rating::parser::{has_required_fields, recover_object, ParsedPrediction};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("Predictions and actuals must have the same length ({predictions} vs {actuals})")]
    LengthMismatch { predictions: usize, actuals: usize },
}

/// Evaluation of one prompting approach over one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachResult {
    pub approach_name: String,
    pub total_responses: usize,
    /// Responses whose recovered object carries both rating fields.
    pub valid_json_count: usize,
    pub json_validity_rate: f64,
    pub valid_predictions_count: usize,
    /// Exact-match percentage over valid predictions only.
    pub accuracy: f64,
    pub predictions: Vec<Option<u8>>,
    pub actual_ratings: Vec<u8>,
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Percentage of exact matches between `predictions` and `actuals`.
pub fn accuracy(predictions: &[u8], actuals: &[u8]) -> Result<f64, MetricsError> {
    if predictions.len() != actuals.len() {
        return Err(MetricsError::LengthMismatch {
            predictions: predictions.len(),
            actuals: actuals.len(),
        });
    }

    let correct = predictions
        .iter()
        .zip(actuals)
        .filter(|(p, a)| p == a)
        .count();
    Ok(percentage(correct, predictions.len()))
}

/// Percentage of responses from which any JSON object could be recovered.
#[allow(dead_code)]
pub fn json_validity_rate<S: AsRef<str>>(raw_responses: &[S]) -> f64 {
    let objects: Vec<_> = raw_responses
        .iter()
        .map(|r| recover_object(r.as_ref()))
        .collect();
    recovered_rate(&objects)
}

fn recovered_rate(objects: &[Option<Map<String, Value>>]) -> f64 {
    percentage(objects.iter().flatten().count(), objects.len())
}

/// Percentage of items on which every run that covers the item agrees.
///
/// The item count is taken from the first run. Absent predictions compare
/// equal to each other, so two runs that both failed on an item agree.
pub fn consistency(runs: &[Vec<Option<u8>>]) -> f64 {
    let Some(first) = runs.first() else {
        return 0.0;
    };
    let num_items = first.len();

    let consistent = (0..num_items)
        .filter(|&i| {
            let mut values = runs.iter().filter_map(|run| run.get(i));
            match values.next() {
                Some(head) => values.all(|v| v == head),
                None => false,
            }
        })
        .count();

    percentage(consistent, num_items)
}

/// Parses every response once and aggregates the metrics for one approach.
pub fn evaluate_approach<S: AsRef<str>>(
    approach_name: &str,
    raw_responses: &[S],
    actual_ratings: &[u8],
) -> Result<ApproachResult, MetricsError> {
    if raw_responses.len() != actual_ratings.len() {
        return Err(MetricsError::LengthMismatch {
            predictions: raw_responses.len(),
            actuals: actual_ratings.len(),
        });
    }

    let objects: Vec<_> = raw_responses
        .iter()
        .map(|r| recover_object(r.as_ref()))
        .collect();

    let valid_json_count = objects
        .iter()
        .flatten()
        .filter(|object| has_required_fields(object))
        .count();

    let predictions: Vec<Option<u8>> = objects
        .iter()
        .map(|o| {
            o.as_ref()
                .and_then(|object| ParsedPrediction::from_object(object).predicted_stars)
        })
        .collect();

    for (idx, (predicted, actual)) in predictions.iter().zip(actual_ratings).enumerate() {
        debug!("Item {idx}: predicted {predicted:?}, actual {actual}");
    }

    let (valid_predictions, corresponding_actuals): (Vec<u8>, Vec<u8>) = predictions
        .iter()
        .zip(actual_ratings)
        .filter_map(|(p, a)| p.map(|p| (p, *a)))
        .unzip();

    let accuracy = accuracy(&valid_predictions, &corresponding_actuals)?;

    Ok(ApproachResult {
        approach_name: approach_name.to_string(),
        total_responses: raw_responses.len(),
        valid_json_count,
        json_validity_rate: recovered_rate(&objects),
        valid_predictions_count: valid_predictions.len(),
        accuracy,
        predictions,
        actual_ratings: actual_ratings.to_vec(),
    })
}
