//! Response Parser — recovers a rating payload from free-form oracle text.
//!
//! Recovery runs in two stages: the whole text as a JSON object, then the first
//! single-level `{...}` substring. The second stage never matches across nested braces.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// First brace-delimited span with no braces inside it.
static FLAT_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]*\}").expect("flat object pattern is valid"));

pub const STARS_FIELD: &str = "predicted_stars";
pub const EXPLANATION_FIELD: &str = "explanation";

const MIN_STARS: i64 = 1;
const MAX_STARS: i64 = 5;

/// Rating payload extracted from one oracle response. Absent fields mean the
/// response could not be parsed or the rating was unusable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPrediction {
    pub predicted_stars: Option<u8>,
    pub explanation: Option<String>,
}

impl ParsedPrediction {
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            predicted_stars: object.get(STARS_FIELD).and_then(coerce_stars),
            explanation: object
                .get(EXPLANATION_FIELD)
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }
}

/// Parses `raw_text` into a prediction. Never fails: unrecoverable text yields
/// an empty payload.
#[allow(dead_code)]
pub fn parse(raw_text: &str) -> ParsedPrediction {
    recover_object(raw_text)
        .map(|object| ParsedPrediction::from_object(&object))
        .unwrap_or_default()
}

/// Returns the JSON object recoverable from `raw_text`, if any.
pub fn recover_object(raw_text: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(raw_text) {
        return Some(object);
    }

    let candidate = FLAT_OBJECT.find(raw_text)?;
    match serde_json::from_str::<Value>(candidate.as_str()) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

/// True when both rating fields are present, whatever their values.
pub fn has_required_fields(object: &Map<String, Value>) -> bool {
    object.contains_key(STARS_FIELD) && object.contains_key(EXPLANATION_FIELD)
}

/// Integer coercion of a rating value, rejecting anything outside 1..=5.
fn coerce_stars(value: &Value) -> Option<u8> {
    let stars = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            // Floats truncate toward zero; u64 beyond i64 is out of range anyway.
            None => n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)?,
        },
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        Value::Bool(b) => i64::from(*b),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    if (MIN_STARS..=MAX_STARS).contains(&stars) {
        u8::try_from(stars).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_rating_recovered() {
        for r in 1..=5u8 {
            let raw = format!(r#"{{"predicted_stars": {r}, "explanation": "because"}}"#);
            let parsed = parse(&raw);
            assert_eq!(parsed.predicted_stars, Some(r));
            assert_eq!(parsed.explanation.as_deref(), Some("because"));
        }
    }

    #[test]
    fn test_string_rating_recovered() {
        for r in 1..=5u8 {
            let raw = format!(r#"{{"predicted_stars": "{r}", "explanation": "e"}}"#);
            assert_eq!(parse(&raw).predicted_stars, Some(r));
        }
    }

    #[test]
    fn test_out_of_range_rating_is_absent() {
        for r in [0, 6, -1, 100] {
            let raw = format!(r#"{{"predicted_stars": {r}, "explanation": "e"}}"#);
            let parsed = parse(&raw);
            assert_eq!(parsed.predicted_stars, None, "rating {r} should be absent");
            assert_eq!(parsed.explanation.as_deref(), Some("e"));
        }
    }

    #[test]
    fn test_text_without_braces_is_fully_absent() {
        assert_eq!(parse("I think this is four stars."), ParsedPrediction::default());
        assert_eq!(parse(""), ParsedPrediction::default());
        assert!(recover_object("no json here").is_none());
    }

    #[test]
    fn test_object_followed_by_prose() {
        let raw = r#"{"predicted_stars": 4, "explanation": "solid"} Hope that helps!"#;
        assert_eq!(parse(raw).predicted_stars, Some(4));
    }

    #[test]
    fn test_object_wrapped_in_prose_and_fences() {
        let raw = "Sure! Here is my answer:\n```json\n{\"predicted_stars\": 2, \"explanation\": \"meh\"}\n```";
        let parsed = parse(raw);
        assert_eq!(parsed.predicted_stars, Some(2));
        assert_eq!(parsed.explanation.as_deref(), Some("meh"));
    }

    #[test]
    fn test_only_first_flat_object_is_tried() {
        let raw = r#"{"note": oops} then {"predicted_stars": 5, "explanation": "x"}"#;
        assert!(recover_object(raw).is_none());

        let raw = r#"{"predicted_stars": 1} and later {"predicted_stars": 5}"#;
        assert_eq!(parse(raw).predicted_stars, Some(1));
    }

    #[test]
    fn test_nested_object_inside_prose_is_not_recovered_whole() {
        // Stage 2 only sees the inner flat object.
        let raw = r#"Answer: {"result": {"predicted_stars": 3}, "explanation": "x"}"#;
        let object = recover_object(raw).unwrap();
        assert!(object.contains_key("predicted_stars"));
        assert!(!object.contains_key("explanation"));
    }

    #[test]
    fn test_nested_object_as_whole_text_parses_strictly() {
        let raw = r#"{"predicted_stars": 3, "meta": {"confidence": 0.9}, "explanation": "x"}"#;
        assert_eq!(parse(raw).predicted_stars, Some(3));
    }

    #[test]
    fn test_top_level_scalar_falls_through() {
        assert!(recover_object("5").is_none());
        assert!(recover_object("[1, 2]").is_none());
    }

    #[test]
    fn test_coercion_rules() {
        assert_eq!(coerce_stars(&serde_json::json!(4.7)), Some(4));
        assert_eq!(coerce_stars(&serde_json::json!(0.5)), None);
        assert_eq!(coerce_stars(&serde_json::json!(" 3 ")), Some(3));
        assert_eq!(coerce_stars(&serde_json::json!("+2")), Some(2));
        assert_eq!(coerce_stars(&serde_json::json!("4.0")), None);
        assert_eq!(coerce_stars(&serde_json::json!("four")), None);
        assert_eq!(coerce_stars(&serde_json::json!(true)), Some(1));
        assert_eq!(coerce_stars(&serde_json::json!(false)), None);
        assert_eq!(coerce_stars(&Value::Null), None);
        assert_eq!(coerce_stars(&serde_json::json!([4])), None);
        assert_eq!(coerce_stars(&serde_json::json!(u64::MAX)), None);
    }

    #[test]
    fn test_non_string_explanation_is_absent() {
        let parsed = parse(r#"{"predicted_stars": 3, "explanation": 42}"#);
        assert_eq!(parsed.predicted_stars, Some(3));
        assert_eq!(parsed.explanation, None);
    }

    #[test]
    fn test_required_fields_check_ignores_values() {
        let object = recover_object(r#"{"predicted_stars": null, "explanation": null}"#).unwrap();
        assert!(has_required_fields(&object));
        let object = recover_object(r#"{"predicted_stars": 3}"#).unwrap();
        assert!(!has_required_fields(&object));
    }
}
