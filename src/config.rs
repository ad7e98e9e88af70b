//! Configuration management.

use serde::Deserialize;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Sanitizer configuration
    #[serde(default)]
    pub sanitizer: SanitizerSettings,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

/// Sanitizer pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SanitizerSettings {
    /// Whether the request sanitizer middleware is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Route prefixes exempt from request sanitization
    #[serde(default)]
    pub exempt_paths: Vec<String>,

    /// Maximum request body size in bytes before a 413 is returned
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Maximum per-field size in bytes before truncation
    #[serde(default = "default_max_field_bytes")]
    pub max_field_bytes: usize,

    /// Maximum URL length in bytes
    #[serde(default = "default_max_url_length")]
    pub max_url_length: usize,
}

impl Default for SanitizerSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            exempt_paths: Vec::new(),
            max_body_bytes: default_max_body_bytes(),
            max_field_bytes: default_max_field_bytes(),
            max_url_length: default_max_url_length(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilitySettings {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
        }
    }
}

// Default value functions
fn default_enabled() -> bool { true }
fn default_max_body_bytes() -> usize { 1_048_576 }
fn default_max_field_bytes() -> usize { 1_048_576 }
fn default_max_url_length() -> usize { 2048 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }

impl Settings {
    /// Load configuration from environment variables.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("BAYAN").separator("__"))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Load from a specific file path, with environment overrides.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("BAYAN").separator("__"))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }
}
