// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ClipFetchError, ClipFetchResult};
use crate::utils::logging::LoggingConfig;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "clipfetch.toml";

/// Whole application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub tools: ToolsConfig,
    pub download: DownloadConfig,
    pub logging: LoggingConfig,
}

/// `[tools]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Explicit ffmpeg executable, probed before the standard locations
    pub ffmpeg_path: Option<PathBuf>,
    /// Explicit yt-dlp executable, probed before the standard locations
    pub ytdlp_path: Option<PathBuf>,
}

/// `[download]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DownloadConfig {
    /// Destination directory; the working directory when unset
    pub output_dir: Option<PathBuf>,
    /// Quality slug or label used when the command line names none
    pub default_quality: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            default_quality: "best".to_string(),
        }
    }
}

impl AppConfig {
    /// Destination directory, falling back to `.`
    pub fn output_dir(&self) -> PathBuf {
        self.download
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Read and parse one configuration file
    pub fn load(path: &Path) -> ClipFetchResult<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|source| ClipFetchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, path)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration text; `origin` is only used in errors
    pub fn parse(content: &str, origin: &Path) -> ClipFetchResult<AppConfig> {
        toml::from_str(content).map_err(|source| ClipFetchError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Render a configuration back to TOML
    pub fn serialize(config: &AppConfig) -> String {
        // AppConfig only holds strings, paths and booleans, which always serialize
        toml::to_string_pretty(config).unwrap_or_default()
    }

    /// Per-user config file location
    pub fn user_config_path() -> Option<PathBuf> {
        if cfg!(windows) {
            return std::env::var_os("APPDATA")
                .map(|appdata| PathBuf::from(appdata).join("clipfetch").join("config.toml"));
        }
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|path| path.is_absolute())
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
        Some(base.join("clipfetch").join("config.toml"))
    }

    /// Files probed in order when no explicit path is given
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        paths.extend(Self::user_config_path());
        paths
    }

    /// Explicit path wins and must exist; otherwise the first existing default
    pub fn find_config_file(explicit: Option<&Path>) -> ClipFetchResult<Option<PathBuf>> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ClipFetchError::ConfigRead {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
                });
            }
            return Ok(Some(path.to_path_buf()));
        }
        let found = Self::default_config_paths().into_iter().find(|path| path.is_file());
        if found.is_none() {
            debug!("No configuration file found, using defaults");
        }
        Ok(found)
    }
}
