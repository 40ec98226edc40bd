//! Error types for the Wikiweave engine.
//!
//! The transformation itself never fails: malformed markup degrades to
//! literal text. Errors only surface at the configuration boundary
//! (options, handler registration, resource loading through fallible APIs).

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The core error type for all configuration-time operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Resource file not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Option name not part of the registry
    #[error("Unknown option: {name}")]
    UnknownOption { name: String },

    /// Option value of the wrong type or an invalid pattern
    #[error("Invalid value for option {name}: {reason}")]
    InvalidOption { name: String, reason: String },

    /// Malformed extension handler key or handler/key kind mismatch
    #[error("Invalid handler registration {key}: {reason}")]
    InvalidHandler { key: String, reason: String },

    /// Invalid configuration document
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Create an unknown option error
    pub fn unknown_option(name: impl Into<String>) -> Self {
        Error::UnknownOption { name: name.into() }
    }

    /// Create an invalid option value error
    pub fn invalid_option(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidOption {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid handler registration error
    pub fn invalid_handler(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidHandler {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }
}
