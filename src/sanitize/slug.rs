//! URL slug generation.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Upper bound on slug length, in characters.
const MAX_SLUG_LEN: usize = 100;

/// Placeholder when the input reduces to nothing.
const DEFAULT_SLUG: &str = "untitled";

/// Generate a deterministic URL slug.
///
/// The input is lowercased, diacritics are stripped via NFD decomposition,
/// and every run of characters outside `[a-z0-9]` becomes a single hyphen.
/// The result always matches `^[a-z0-9]+(-[a-z0-9]+)*$`, or is
/// `"untitled"` when nothing survives.
pub fn generate_slug(input: &str) -> String {
    let lowered = input.to_lowercase();

    // NFD splits accented letters into base + combining mark; dropping the
    // marks transliterates "â" to "a". Characters with no ASCII base are
    // handled by the hyphen fold below.
    let decomposed: String = lowered.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let mut slug = String::with_capacity(decomposed.len());
    let mut pending_hyphen = false;
    for c in decomposed.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        return DEFAULT_SLUG.to_string();
    }

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid_slug(s: &str) {
        assert!(
            s == "untitled"
                || (s.split('-').all(|part| {
                    !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric())
                })),
            "invalid slug {s:?}"
        );
    }

    #[test]
    fn test_basic_slug() {
        assert_eq!(generate_slug("Barangay Clearance Request"), "barangay-clearance-request");
    }

    #[test]
    fn test_diacritics_transliterated() {
        assert_eq!(generate_slug("Peñafrancia Fiesta"), "penafrancia-fiesta");
        assert_eq!(generate_slug("Crème brûlée"), "creme-brulee");
    }

    #[test]
    fn test_symbol_runs_collapse_to_one_hyphen() {
        assert_eq!(generate_slug("a --- b & c!!!"), "a-b-c");
    }

    #[test]
    fn test_edge_hyphens_trimmed() {
        assert_eq!(generate_slug("  --hello--  "), "hello");
    }

    #[test]
    fn test_empty_defaults_to_untitled() {
        assert_eq!(generate_slug(""), "untitled");
        assert_eq!(generate_slug("!!! ***"), "untitled");
    }

    #[test]
    fn test_truncation_trims_orphan_hyphen() {
        // 99 chars then a hyphen boundary right at the cut.
        let input = format!("{} {}", "a".repeat(99), "b".repeat(20));
        let out = generate_slug(&input);
        assert_eq!(out.len(), 99);
        assert!(!out.ends_with('-'));
        assert_valid_slug(&out);
    }

    #[test]
    fn test_charset_property() {
        for input in ["Hello, World!", "ünïcödé", "123 Main St.", "---", "ÑÑÑ"] {
            assert_valid_slug(&generate_slug(input));
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(generate_slug("Sample Title"), generate_slug("Sample Title"));
    }
}
