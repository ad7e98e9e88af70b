//! The structural walker: full-pipeline sanitization of scalars and of
//! arbitrarily nested request data.

use serde_json::{Map, Value};

use super::encode::html_encode;
use super::normalize::{normalize, normalize_scalar};
use super::patterns::{filter_sql, filter_xss};

/// Per-field byte cap applied after normalization, before the regex cascade.
pub const MAX_FIELD_BYTES: usize = 1_048_576;

/// Run the full scalar pipeline: normalize, cap, SQL filter, XSS filter,
/// HTML-encode, in that fixed order.
///
/// Normalization runs first so the filters see clean single-line text;
/// encoding runs last so sentinel tokens and filtered remainders are
/// rendered inert for HTML context.
pub fn sanitize_value(input: &str) -> String {
    sanitize_value_capped(input, MAX_FIELD_BYTES)
}

/// [`sanitize_value`] with an explicit field byte cap.
pub fn sanitize_value_capped(input: &str, max_bytes: usize) -> String {
    let normalized = truncate_at_boundary(normalize(input), max_bytes);
    html_encode(&filter_xss(&filter_sql(&normalized)))
}

/// Sanitize every key and value of a nested structure.
///
/// Keys are replaced with their sanitized form, nested maps and arrays are
/// recursed, and every other leaf is coerced to a sanitized string. The
/// result has the same nesting shape as the input; map insertion order is
/// preserved.
pub fn sanitize_structure(value: &Value) -> Value {
    sanitize_structure_capped(value, MAX_FIELD_BYTES)
}

/// [`sanitize_structure`] with an explicit per-field byte cap.
pub fn sanitize_structure_capped(value: &Value, max_bytes: usize) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, nested) in map {
                // If two hostile keys sanitize to the same text the later
                // entry wins; benign key sets are unaffected.
                out.insert(
                    sanitize_value_capped(key, max_bytes),
                    sanitize_structure_capped(nested, max_bytes),
                );
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| sanitize_structure_capped(item, max_bytes))
                .collect(),
        ),
        leaf => Value::String(sanitize_value_capped(&normalize_scalar(leaf), max_bytes)),
    }
}

fn truncate_at_boundary(mut s: String, max_bytes: usize) -> String {
    if s.len() > max_bytes {
        let mut end = max_bytes;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}
