use thiserror::Error;

/// Errors produced when validating an ingestion payload
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Status code {0} outside valid range 100-599")]
    InvalidStatusCode(u16),

    #[error("Latency must be a non-negative number, got {0}")]
    InvalidLatency(f64),

    #[error("Interval must be a positive number of seconds, got {0}")]
    InvalidInterval(i64),

    #[error("error_message must be present exactly when status_code >= 400 (status {0})")]
    ErrorMessageMismatch(u16),
}

/// Errors that can occur when managing alert rules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlertError {
    #[error("Alert rule not found: {0}")]
    RuleNotFound(String),
}

/// Errors that can occur during configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Invalid configuration value: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}
