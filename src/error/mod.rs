//! Error handling module for clipfetch

use std::path::PathBuf;

use thiserror::Error;

/// Infrastructure errors outside a single download operation
#[derive(Error, Debug)]
pub enum ClipFetchError {
    /// Configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::adapters::AppConfig`]
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A configuration value is out of its allowed set
    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfigValue { key: String, value: String },

    /// Logging could not be installed
    #[error("Failed to initialize logging: {message}")]
    LoggingInit { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for clipfetch infrastructure operations
pub type ClipFetchResult<T> = std::result::Result<T, ClipFetchError>;
