//! Comparison and matching semantics for JSON field values.
//!
//! Records carry loosely typed JSON; these helpers pin down how the query
//! and aggregation engines read them.

use serde_json::Value;
use std::cmp::Ordering;

/// Three-way comparison used by sorting.
///
/// Numbers compare numerically, text lexicographically, booleans
/// `false < true`. Every other pairing (missing, null, mixed types,
/// containers) compares as equal.
#[must_use]
pub fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Categorical equality against a filter literal.
///
/// Text must match exactly; numbers and booleans match their JSON rendering.
#[must_use]
pub fn matches_literal(value: Option<&Value>, literal: &str) -> bool {
    match value {
        Some(Value::String(s)) => s == literal,
        Some(Value::Number(n)) => n.to_string() == literal,
        Some(Value::Bool(b)) => b.to_string() == literal,
        _ => false,
    }
}

/// Case-insensitive substring test; `needle` must already be lower-cased.
#[must_use]
pub fn contains_text(value: Option<&Value>, needle: &str) -> bool {
    match value {
        Some(Value::String(s)) => s.to_lowercase().contains(needle),
        _ => false,
    }
}

/// Numeric reading with missing and non-numeric values counted as zero.
#[must_use]
pub fn number_or_zero(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(0.0)
}

/// True when the value is absent, null, or an empty string.
#[must_use]
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

///
/// TESTS
///
