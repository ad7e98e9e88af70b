//! Filename sanitizer for uploaded and generated documents.

use super::normalize::normalize;

/// Upper bound on sanitized filename length, in bytes.
const MAX_FILENAME_BYTES: usize = 255;

/// Placeholder when sanitization leaves nothing usable.
const DEFAULT_FILENAME: &str = "unnamed_file";

/// Sanitize a string destined to be a filename.
///
/// Reserved characters (`<>:"/\|?*`) and traversal tokens are stripped, an
/// empty result falls back to `"unnamed_file"`, and anything longer than
/// 255 bytes is clamped with the extension preserved. Never empty, never
/// over the bound.
pub fn sanitize_filename(input: &str) -> String {
    let mut name = normalize(input);

    // Traversal tokens go first, while the separators are still present.
    loop {
        let pass = name
            .replace("../", "")
            .replace("..\\", "")
            .replace("./", "")
            .replace(".\\", "");
        if pass == name {
            break;
        }
        name = pass;
    }

    let name: String = name
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect();

    // "." and ".." are valid path components, never valid filenames.
    if name.is_empty() || name.chars().all(|c| c == '.') {
        return DEFAULT_FILENAME.to_string();
    }

    clamp_with_extension(name)
}

/// Truncate the base name so base plus extension fits the byte bound.
fn clamp_with_extension(name: String) -> String {
    if name.len() <= MAX_FILENAME_BYTES {
        return name;
    }

    match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot < MAX_FILENAME_BYTES => {
            let ext = &name[dot..];
            let budget = MAX_FILENAME_BYTES - ext.len();
            let base = truncate_at_boundary(&name[..dot], budget);
            format!("{base}{ext}")
        }
        // No extension, or an extension too long to preserve.
        _ => truncate_at_boundary(&name, MAX_FILENAME_BYTES).to_string(),
    }
}

fn truncate_at_boundary(s: &str, max_bytes: usize) -> &str {
    let mut end = max_bytes.min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
