//! Error types for the waymark-settings library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application.

use thiserror::Error;

/// Errors that can occur in the waymark-settings application.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Preference store errors
    #[error("Store error: {0}")]
    Store(String),

    /// Binary encoding/decoding of stored preference values
    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or duplicate preference key
    #[error("Invalid preference key: {0}")]
    InvalidKey(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with SettingsError
pub type Result<T> = std::result::Result<T, SettingsError>;

impl From<anyhow::Error> for SettingsError {
    fn from(err: anyhow::Error) -> Self {
        SettingsError::Other(err.to_string())
    }
}

impl From<sled::Error> for SettingsError {
    fn from(err: sled::Error) -> Self {
        SettingsError::Store(err.to_string())
    }
}
