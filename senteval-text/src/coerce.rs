//! Conversions from non-string values into normalizer input.
//!
//! The normalizer only accepts `&str`. Callers holding numbers, optional
//! values or JSON cells pick one of these helpers so the stringification rule
//! is visible at the call site.

use std::fmt::Display;

use serde_json::Value;

/// Render a value with its `Display` implementation.
pub fn coerce_to_text<T: Display + ?Sized>(value: &T) -> String {
    value.to_string()
}

/// Missing values become the empty string.
pub fn coerce_optional<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// `null` becomes the empty string and strings are taken without quotes.
/// Every other JSON value is rendered compactly.
pub fn coerce_json(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
