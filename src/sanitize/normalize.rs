//! String normalization: the first stage of the pipeline.

use serde_json::Value;

/// Returns true for the control characters the normalizer removes.
///
/// Tab, LF, and CR survive this check; they are folded into a single space
/// by the whitespace collapse below, so the net output is still one line.
fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}

/// Normalize a string: strip null bytes and control characters, trim, and
/// collapse every whitespace run (including tab/LF/CR) to one ASCII space.
///
/// The output contains no control characters and no leading, trailing, or
/// repeated whitespace.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for c in input.chars() {
        if is_stripped_control(c) {
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

/// Coerce a scalar JSON value to a normalized string.
///
/// `null` becomes the empty string; numbers and booleans are rendered and
/// normalized. Arrays and objects also collapse to the empty string, but
/// reaching this function with one is a programmer error: the structural
/// walker is the only supported entry point for nested data.
pub fn normalize_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => normalize(s),
        Value::Bool(b) => normalize(&b.to_string()),
        Value::Number(n) => normalize(&n.to_string()),
        Value::Array(_) | Value::Object(_) => {
            debug_assert!(
                false,
                "normalize_scalar called on nested data; use sanitize_structure"
            );
            String::new()
        }
    }
}
