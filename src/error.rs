use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the roster service
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Configuration error: {0}")]
    #[diagnostic(code(rosterbot::config))]
    Config(String),

    #[error("Store error: {0}")]
    #[diagnostic(code(rosterbot::store))]
    Store(String),

    #[error("Validation error: {0}")]
    #[diagnostic(code(rosterbot::validation))]
    Validation(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(rosterbot::not_found))]
    NotFound(String),

    #[error("Roster service error: {0}")]
    #[diagnostic(code(rosterbot::service))]
    Service(String),

    #[error(transparent)]
    #[diagnostic(code(rosterbot::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(rosterbot::serialization))]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Store(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type RosterResult<T> = Result<T, Error>;

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create store errors
pub fn store_error(message: &str) -> Error {
    Error::Store(message.to_string())
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create not-found errors
pub fn not_found_error(message: &str) -> Error {
    Error::NotFound(message.to_string())
}

/// Helper to create roster service errors
pub fn service_error(message: &str) -> Error {
    Error::Service(message.to_string())
}
