//! Core error types for eyebreak-core.
//!
//! Errors here only ever come from the configuration boundary and from
//! storage. The cycles themselves never fail: collaborator failures are
//! reported as [`HookError`] and swallowed after logging.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for eyebreak-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Stored value could not be interpreted
    #[error("Corrupt value for '{key}': {value}")]
    CorruptValue { key: String, value: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No usable configuration directory
    #[error("Cannot determine configuration directory")]
    NoConfigDir,
}

/// Validation errors raised at the configuration boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("focus duration must be between {min} and {max} minutes, got {value}")]
    FocusOutOfRange { value: u32, min: u32, max: u32 },

    #[error("focus duration must be a multiple of {step} minutes, got {value}")]
    FocusStep { value: u32, step: u32 },

    #[error("break duration must be between {min} and {max} minutes, got {value}")]
    BreakOutOfRange { value: u32, min: u32, max: u32 },

    #[error("interval index {index} out of bounds (presets: {len})")]
    UnknownInterval { index: usize, len: usize },
}

/// Failure reported by an external collaborator (chime, notifier).
///
/// The cycles never propagate these.
#[derive(Error, Debug)]
pub enum HookError {
    /// A sound file, illustration or similar asset is not available
    #[error("resource not found: {0}")]
    ResourceMissing(String),

    /// The backing service could not be reached
    #[error("{service} unavailable: {message}")]
    Unavailable { service: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
