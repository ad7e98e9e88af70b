//! HTML entity encoding: the last stage of the pipeline.

/// Escape the five characters that matter for HTML and attribute context.
///
/// Ampersands are handled positionally with everything else in a single
/// pass, so entities introduced by the encoding itself are never
/// re-escaped.
pub fn html_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
