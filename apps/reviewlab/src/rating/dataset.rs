//! Dataset loading and deterministic down-sampling for the rating evaluator.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

const TEXT_COLUMNS: [&str; 2] = ["text", "review"];
const RATING_COLUMNS: [&str; 2] = ["stars", "rating"];

/// One labelled review from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub text: String,
    pub actual_rating: u8,
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset has no {kind} column (expected one of: {expected})")]
    MissingColumn { kind: &'static str, expected: String },

    #[error("Row {row}: invalid rating '{value}'")]
    InvalidRating { row: usize, value: String },
}

/// Reads every labelled review from a CSV file with headers.
///
/// Rows with blank text are skipped.
pub fn load_reviews(path: &Path) -> Result<Vec<ReviewRecord>, DatasetError> {
    info!("Loading reviews from {}...", path.display());

    let mut reader = csv::Reader::from_path(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let headers = reader.headers()?.clone();

    let text_idx = find_column(&headers, &TEXT_COLUMNS, "text")?;
    let rating_idx = find_column(&headers, &RATING_COLUMNS, "rating")?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        let text = row.get(text_idx).unwrap_or("");
        if text.trim().is_empty() {
            debug!("Skipping row {i}: empty review text");
            continue;
        }

        let raw_rating = row.get(rating_idx).unwrap_or("");
        let actual_rating = parse_rating(raw_rating).ok_or_else(|| DatasetError::InvalidRating {
            row: i,
            value: raw_rating.to_string(),
        })?;

        records.push(ReviewRecord {
            text: text.to_string(),
            actual_rating,
        });
    }

    info!("Loaded {} reviews", records.len());
    Ok(records)
}

fn find_column(
    headers: &csv::StringRecord,
    candidates: &[&str],
    kind: &'static str,
) -> Result<usize, DatasetError> {
    candidates
        .iter()
        .find_map(|name| headers.iter().position(|h| h.trim() == *name))
        .ok_or_else(|| DatasetError::MissingColumn {
            kind,
            expected: candidates.join(", "),
        })
}

/// Accepts integer ratings, including integer-valued floats such as "4.0".
fn parse_rating(raw: &str) -> Option<u8> {
    let raw = raw.trim();
    let value = match raw.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let f = raw.parse::<f64>().ok()?;
            if !f.is_finite() || f.fract() != 0.0 {
                return None;
            }
            f as i64
        }
    };
    u8::try_from(value).ok().filter(|r| (1..=5).contains(r))
}

/// Returns `sample_size` records chosen with a seeded RNG, or every record when
/// the dataset is not larger than the sample.
pub fn sample_reviews(records: Vec<ReviewRecord>, sample_size: usize, seed: u64) -> Vec<ReviewRecord> {
    if records.len() <= sample_size {
        return records;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let picked = rand::seq::index::sample(&mut rng, records.len(), sample_size);

    let mut slots: Vec<Option<ReviewRecord>> = records.into_iter().map(Some).collect();
    picked
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}
