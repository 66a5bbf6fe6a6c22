//! Error types for the Windows version helper
//!
//! Provides the structured error type for node attribute loading,
//! platform validation, and version classification.

use thiserror::Error;

/// Message reported whenever a query runs against a non-Windows node
pub const UNSUPPORTED_PLATFORM_MESSAGE: &str =
    "Windows helper are only supported on windows platform!";

/// Unified error type for the helper
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Classification Errors
    // =========================================================================
    #[error("Windows helper are only supported on windows platform!")]
    UnsupportedPlatform { platform: Option<String> },

    #[error("Missing node attribute: {path}")]
    MissingField { path: String },

    #[error("Invalid platform version: {value:?}")]
    InvalidVersion { value: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn missing(path: &str) -> Self {
        Error::MissingField {
            path: path.to_string(),
        }
    }

    /// Check if this error came from the platform guard
    pub fn is_unsupported_platform(&self) -> bool {
        matches!(self, Error::UnsupportedPlatform { .. })
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::UnsupportedPlatform { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for the helper
pub type Result<T> = std::result::Result<T, Error>;
