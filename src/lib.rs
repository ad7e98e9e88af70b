//! # Bayan Core
//!
//! Shared input sanitization pipeline for the Bayan civic services platform.
//!
//! ## Architecture
//!
//! - **Sanitize**: the layered text-defanging pipeline (normalizer, SQL/XSS
//!   pattern filters, HTML entity encoder, and the structural walker that
//!   applies them to arbitrarily nested request data)
//! - **Specialized sanitizers**: URL, path, filename, email, phone, IP, and
//!   slug helpers for strings headed to the filesystem, redirects, or display
//! - **Middleware**: tower layers that rewrite inbound query strings, bodies,
//!   path segments, and headers before they reach handlers, plus a payload
//!   size guard
//! - **Telemetry**: structured logging infrastructure
//!
//! Every transformation is stateless and synchronous; the only shared state
//! is the read-only compiled rule lists, so concurrent requests need no
//! coordination.

pub mod config;
pub mod error;
pub mod middleware;
pub mod sanitize;
pub mod telemetry;

pub use error::{BayanError, ErrorCode, ErrorContext, ErrorSeverity, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Settings, SanitizerSettings};
    pub use crate::error::{BayanError, ErrorCode, ErrorContext, ErrorSeverity, Result};
    pub use crate::middleware::{
        InputSanitizerLayer, InputSanitizerService, SanitizeConfig,
        RequestSizeLayer, RequestSizeConfig,
    };
    pub use crate::sanitize::{
        normalize, normalize_scalar, FILTERED,
        filter_sql, filter_xss, html_encode,
        sanitize_value, sanitize_value_capped,
        sanitize_structure, sanitize_structure_capped,
        sanitize_url, sanitize_path, sanitize_filename,
        sanitize_email, sanitize_phone_number, sanitize_ip_address,
        generate_slug, SanitizeError,
    };
}
