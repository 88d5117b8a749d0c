//! Core error types for tomata-core.
//!
//! One umbrella enum plus per-domain enums, all built on thiserror.
//! Silent no-op rejections (pausing an idle timer, switching modes
//! mid-run) are not errors -- commands signal those by returning `None`.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tomata-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend authentication errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database file
    #[error("failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("query failed: {0}")]
    Query(String),

    /// Data directory could not be resolved or created
    #[error("data directory unavailable: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Query(err.to_string())
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Value could not be parsed for the given key
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the backend auth client.
///
/// Messages are human-readable; the CLI prints them verbatim.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The backend rejected the request (non-2xx with a message body)
    #[error("{message}")]
    Api { message: String },

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Malformed base URL
    #[error("invalid API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    /// OS keyring access failed
    #[error("keyring error: {0}")]
    Keyring(String),

    /// No stored credentials
    #[error("not authenticated")]
    NotAuthenticated,
}

/// Validation errors for user-supplied data.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value for a named field
    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
