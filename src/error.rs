use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Validation error: {0}")]
    #[diagnostic(code(calman::validation))]
    Validation(String),

    #[error("Calendar API error: {0}")]
    #[diagnostic(code(calman::remote))]
    Remote(String),

    #[error("Credentials error: {0}")]
    #[diagnostic(code(calman::credentials))]
    Credentials(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(calman::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calman::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(calman::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(calman::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(calman::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for JSON serialization errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Transport failures from the provider surface as remote errors, unchanged
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Remote(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type CalResult<T> = Result<T, Error>;

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create remote calendar errors
pub fn remote_error(message: &str) -> Error {
    Error::Remote(message.to_string())
}

/// Helper to create credentials errors
pub fn credentials_error(message: &str) -> Error {
    Error::Credentials(message.to_string())
}

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
#[allow(dead_code)]
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create other errors
#[allow(dead_code)]
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
