//! Logging configuration and subscriber installation

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::error::{ClipFetchError, ClipFetchResult};

/// Levels accepted in configuration and on the command line
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Logging configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Global log level
    pub level: String,
    /// Emit one JSON object per event instead of text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Check `level` against [`LOG_LEVELS`]
    pub fn validate(&self) -> ClipFetchResult<()> {
        let level = self.level.to_ascii_lowercase();
        if LOG_LEVELS.contains(&level.as_str()) {
            Ok(())
        } else {
            Err(ClipFetchError::InvalidConfigValue {
                key: "logging.level".to_string(),
                value: self.level.clone(),
            })
        }
    }

    /// Filter for this configuration; a valid `rust_log` directive replaces `level`
    pub fn env_filter(&self, rust_log: Option<&str>) -> ClipFetchResult<EnvFilter> {
        if let Some(filter) = rust_log.and_then(|directive| EnvFilter::try_new(directive).ok()) {
            return Ok(filter);
        }
        self.validate()?;
        EnvFilter::try_new(self.level.to_ascii_lowercase()).map_err(|e| ClipFetchError::LoggingInit {
            message: e.to_string(),
        })
    }
}

/// Install the global subscriber; output goes to stderr so stdout carries results only.
///
/// `RUST_LOG` is honoured only when the level was not given on the command line.
pub fn init_logging(config: &LoggingConfig, level_from_cli: bool) -> ClipFetchResult<()> {
    let rust_log = if level_from_cli {
        None
    } else {
        std::env::var(EnvFilter::DEFAULT_ENV).ok()
    };
    let filter = config.env_filter(rust_log.as_deref())?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr).with_current_span(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()
    };

    result.map_err(|e| ClipFetchError::LoggingInit {
        message: e.to_string(),
    })?;

    tracing::debug!(
        "Logging initialized (level: {}, json: {})",
        config.level,
        config.json
    );
    Ok(())
}
