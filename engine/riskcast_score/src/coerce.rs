//! Lenient score extraction from loosely typed JSON.
//!
//! The prediction API serializes decimal columns either as JSON numbers or
//! as strings (`"4.90"`), and some rows carry `null`. These helpers accept
//! all of them and fall back to the neutral rendering otherwise.

use serde_json::Value as JsonValue;

use crate::category::{classify, Classification};
use crate::score::format_score;

/// Extract a finite number from a JSON value.
///
/// Numbers and numeric strings are accepted; everything else is `None`.
pub fn coerce_score(value: &JsonValue) -> Option<f64> {
    let raw = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|x| x.is_finite())
}

/// Classify a loosely typed score. Non-numeric values classify as Low.
pub fn classify_value(value: &JsonValue) -> Classification {
    classify(coerce_score(value).unwrap_or(0.0))
}

/// Format a loosely typed score. Non-numeric values render as `"0.00"`.
pub fn format_value(value: &JsonValue) -> String {
    match coerce_score(value) {
        Some(x) => format_score(x),
        None => "0.00".to_string(),
    }
}
