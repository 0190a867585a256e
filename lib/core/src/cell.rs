//! Cell probes
//!
//! Cheap, allocation-light checks on individual `serde_json::Value` cells.
//! Dirty tables store numbers as strings, booleans as "True", and missing
//! values in half a dozen spellings; everything that inspects a cell goes
//! through these helpers so the whole pipeline agrees on what a cell means.

use serde_json::Value;

/// Spellings treated as a missing value (compared case-insensitively)
const MISSING_TOKENS: [&str; 5] = ["nan", "none", "null", "nat", "<na>"];

/// Whether a cell carries no usable value
#[inline]
pub fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.is_empty() || MISSING_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
        }
        Value::Number(n) => n.as_f64().map_or(true, |f| !f.is_finite()),
        _ => false,
    }
}

/// Numeric view of a cell: JSON numbers and numeric strings
///
/// Booleans are not numbers here; a column of `true`/`false` is boolean.
#[inline]
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Boolean view of a cell: JSON booleans and "true"/"false" strings
#[inline]
pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.eq_ignore_ascii_case("true") {
                Some(true)
            } else if trimmed.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Render a cell as a label, `None` when missing
///
/// Strings are used verbatim (trimmed), everything else goes through its
/// JSON rendering, so `1` and `"1"` map to the same label.
pub fn as_label(value: &Value) -> Option<String> {
    if is_missing(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

/// Elements of a list-valued cell rendered as labels
///
/// A scalar cell is a one-element list, a missing cell an empty one.
pub fn as_labels(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(as_label).collect(),
        other => as_label(other).into_iter().collect(),
    }
}

/// Number of whitespace separated words in a string cell
#[inline]
pub fn word_count(value: &Value) -> usize {
    match value {
        Value::String(s) => s.split_whitespace().count(),
        _ => 0,
    }
}
