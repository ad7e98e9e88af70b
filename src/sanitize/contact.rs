//! Contact-field sanitizers: email, phone number, IP address.
//!
//! Email and IP are the two partial sanitizers in the pipeline: they
//! validate and fail with [`SanitizeError::InvalidFormat`] instead of
//! silently degrading. Phone numbers keep the total-function contract.

use regex::Regex;
use std::net::IpAddr;
use std::sync::LazyLock;

use super::normalize::normalize;
use super::SanitizeError;

/// Email validation regex (RFC 5322 simplified).
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).expect("Invalid email regex")
});

/// Normalize and validate an email address.
///
/// The address is lowercased and trimmed; malformed input fails with
/// [`SanitizeError::InvalidFormat`]. Callers surface that as a user-facing
/// validation message, not an internal fault.
pub fn sanitize_email(input: &str) -> Result<String, SanitizeError> {
    let email = normalize(input).to_lowercase();
    if !email.is_empty() && EMAIL_REGEX.is_match(&email) {
        Ok(email)
    } else {
        Err(SanitizeError::InvalidFormat { kind: "email" })
    }
}

/// Sanitize a phone number: keep digits, `+`, `-`, parentheses, and spaces,
/// then collapse whitespace and trim.
pub fn sanitize_phone_number(input: &str) -> String {
    let kept: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '))
        .collect();
    normalize(&kept)
}

/// Normalize and validate an IP address (IPv4 or IPv6).
///
/// Returns the normalized input form; parsing is validation only, not
/// canonicalization.
pub fn sanitize_ip_address(input: &str) -> Result<String, SanitizeError> {
    let candidate = normalize(input);
    candidate
        .parse::<IpAddr>()
        .map(|_| candidate)
        .map_err(|_| SanitizeError::InvalidFormat { kind: "ip address" })
}
