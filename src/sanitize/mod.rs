//! The input sanitization pipeline.
//!
//! Every inbound string passes through a layered defanging pass:
//!
//! - **Normalizer**: strips null bytes and control characters, trims, and
//!   collapses whitespace ([`normalize`])
//! - **Pattern filters**: ordered SQL-injection and XSS signature lists,
//!   each match replaced with the `[FILTERED]` sentinel ([`filter_sql`],
//!   [`filter_xss`])
//! - **Entity encoder**: escapes the five HTML-relevant characters
//!   ([`html_encode`])
//! - **Structural walker**: applies the full pass to every key and value of
//!   arbitrarily nested request data ([`sanitize_value`],
//!   [`sanitize_structure`])
//!
//! On top of the pipeline sit the specialized sanitizers for strings headed
//! to the filesystem, redirect targets, or display: [`sanitize_url`],
//! [`sanitize_path`], [`sanitize_filename`], [`sanitize_email`],
//! [`sanitize_phone_number`], [`sanitize_ip_address`], [`generate_slug`].
//!
//! All sanitizers are total functions that degrade rather than reject, with
//! two exceptions: [`sanitize_email`] and [`sanitize_ip_address`] validate
//! and fail with [`SanitizeError::InvalidFormat`]. Callers handling
//! user-submitted contact info must convert that into a user-facing
//! validation message instead of letting it propagate.
//!
//! Pattern-based blacklisting here is a defense-in-depth layer, not a
//! substitute for parameterized queries or templated output escaping. The
//! visible sentinel makes filtering observable in logs and responses.

pub mod contact;
pub mod encode;
pub mod filename;
pub mod normalize;
pub mod patterns;
pub mod slug;
pub mod url;
pub mod walker;

use thiserror::Error;

use crate::error::BayanError;

// ═══════════════════════════════════════════════════════════════════════════════
// Re-exports
// ═══════════════════════════════════════════════════════════════════════════════

pub use contact::{sanitize_email, sanitize_ip_address, sanitize_phone_number};
pub use encode::html_encode;
pub use filename::sanitize_filename;
pub use normalize::{normalize, normalize_scalar};
pub use patterns::{filter_sql, filter_xss, FILTERED};
pub use slug::generate_slug;
pub use url::{sanitize_path, sanitize_url};
pub use walker::{
    sanitize_structure, sanitize_structure_capped, sanitize_value, sanitize_value_capped,
    MAX_FIELD_BYTES,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Error raised by the validating sanitizers.
///
/// Only [`sanitize_email`] and [`sanitize_ip_address`] are partial; every
/// other sanitizer silently rewrites its input to a safer form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    /// The input does not match the expected format.
    #[error("invalid {kind} format")]
    InvalidFormat {
        /// What was being validated ("email", "ip address").
        kind: &'static str,
    },
}

impl From<SanitizeError> for BayanError {
    fn from(error: SanitizeError) -> Self {
        match &error {
            SanitizeError::InvalidFormat { kind } => {
                BayanError::invalid_format(*kind, error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_sanitize_error_converts_to_invalid_format() {
        let err = SanitizeError::InvalidFormat { kind: "email" };
        let bayan: BayanError = err.into();
        assert_eq!(bayan.code(), ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_prelude_surface() {
        // The re-exported pipeline is callable through the module root.
        assert_eq!(sanitize_value("hello"), "hello");
        assert_eq!(FILTERED, "[FILTERED]");
    }
}
