//! URL and filesystem-path sanitizers.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use super::normalize::normalize;

/// Protocol schemes, traversal tokens, and encoded control bytes stripped
/// from URL input before validation. Raw NUL is listed for completeness;
/// the normalizer has already removed it by the time these run.
static MALICIOUS_URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)javascript:",
        r"(?i)vbscript:",
        r"(?i)data:text/html",
        r"(?i)data:application/javascript",
        r"(?i)file://",
        r"(?i)ftp://",
        r"(?i)gopher://",
        r"(?i)news://",
        r"(?i)nntp://",
        r"(?i)telnet://",
        r"(?i)ldap://",
        r"\.\./",
        r"\.\.\\",
        r"\./",
        r"\.\\",
        r"%00",
        r"\x00",
        r"(?i)%(?:0[0-9a-f]|1[0-9a-f]|7f)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid URL strip pattern"))
    .collect()
});

/// Sanitize a string destined to be a URL.
///
/// Malicious protocols, traversal tokens, and percent-encoded control bytes
/// are stripped outright. If what remains parses as an absolute URL it is
/// returned; anything else is treated as a relative path and handed to
/// [`sanitize_path`]. Total: never fails, only degrades.
pub fn sanitize_url(input: &str) -> String {
    let mut stripped = normalize(input);
    for rule in MALICIOUS_URL_PATTERNS.iter() {
        if let std::borrow::Cow::Owned(rewritten) = rule.replace_all(&stripped, "") {
            stripped = rewritten;
        }
    }

    match Url::parse(&stripped) {
        Ok(_) => stripped,
        Err(_) => sanitize_path(&stripped),
    }
}

/// Sanitize a string destined to be a filesystem path.
///
/// Backslashes become forward slashes, traversal tokens are removed to a
/// fixed point, repeated separators collapse, and edge separators are
/// trimmed. The result is always relative.
pub fn sanitize_path(input: &str) -> String {
    let mut path = normalize(input).replace('\\', "/");

    // Token removal can expose new tokens ("..//./" and friends), so run
    // to a fixed point.
    loop {
        let pass = path.replace("../", "").replace("./", "");
        if pass == path {
            break;
        }
        path = pass;
    }

    while path.contains("//") {
        path = path.replace("//", "/");
    }

    path.trim_matches('/').to_string()
}
