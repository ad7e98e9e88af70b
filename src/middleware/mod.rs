//! Request-boundary middleware for the sanitization pipeline.
pub mod request_size;
pub mod sanitize;

pub use request_size::{RequestSizeConfig, RequestSizeLayer};
pub use sanitize::{InputSanitizerLayer, InputSanitizerService, SanitizeConfig};

/// Combined configuration for the request-boundary stack.
#[derive(Debug, Clone, Default)]
pub struct MiddlewareConfig {
    pub request_size: RequestSizeConfig,
    pub input_sanitizer: SanitizeConfig,
}
