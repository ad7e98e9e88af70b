//! Telemetry: structured logging for the sanitization service.

pub mod logging;

pub use logging::{init_logging, preview, LogFormat, LoggingConfig};
