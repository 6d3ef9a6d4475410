//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::{AppConfig, TomlConfigAdapter};
use crate::cli::{Cli, Commands};
use crate::domain::model::Quality;
use crate::error::ClipFetchError;

/// Environment variables and the setting each one overrides
pub const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("CLIPFETCH_FFMPEG", "tools.ffmpeg_path"),
    ("CLIPFETCH_YTDLP", "tools.ytdlp_path"),
    ("CLIPFETCH_OUTPUT_DIR", "download.output_dir"),
    ("CLIPFETCH_QUALITY", "download.default_quality"),
    ("CLIPFETCH_LOG_LEVEL", "logging.level"),
];

/// Where the final configuration came from, for logging once tracing is up
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigReport {
    pub file: Option<PathBuf>,
    pub env_overrides: Vec<&'static str>,
    pub cli_overrides: usize,
}

impl ConfigReport {
    pub fn log(&self) {
        match &self.file {
            Some(path) => info!("Configuration file: {}", path.display()),
            None => info!("No configuration file found, using defaults"),
        }
        for var in &self.env_overrides {
            info!("Environment override: {}", var);
        }
        if self.cli_overrides > 0 {
            info!("Applied {} CLI configuration overrides", self.cli_overrides);
        }
    }
}

/// Build the configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<(AppConfig, ConfigReport)> {
    resolve_configuration(cli, |name| std::env::var(name).ok())
}

/// Same as [`initialize_configuration_hierarchy`] with an injectable environment
pub fn resolve_configuration<F>(cli: &Cli, env: F) -> Result<(AppConfig, ConfigReport)>
where
    F: Fn(&str) -> Option<String>,
{
    let mut report = ConfigReport::default();

    // Step 1 and 2: defaults, then the first config file found
    let mut config = match TomlConfigAdapter::find_config_file(cli.config.as_deref())? {
        Some(path) => {
            let config = TomlConfigAdapter::load(&path)?;
            report.file = Some(path);
            config
        }
        None => AppConfig::default(),
    };

    // Step 3: environment
    report.env_overrides = apply_environment_overrides(&mut config, env);

    // Step 4: command line
    report.cli_overrides = apply_cli_overrides(&mut config, cli);

    validate(&config).context("Invalid configuration")?;
    Ok((config, report))
}

/// Apply `CLIPFETCH_*` variables; empty values are ignored
pub fn apply_environment_overrides<F>(config: &mut AppConfig, env: F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = Vec::new();
    for (var, _key) in ENV_MAPPINGS {
        let Some(value) = env(*var).filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        match *var {
            "CLIPFETCH_FFMPEG" => config.tools.ffmpeg_path = Some(PathBuf::from(value)),
            "CLIPFETCH_YTDLP" => config.tools.ytdlp_path = Some(PathBuf::from(value)),
            "CLIPFETCH_OUTPUT_DIR" => config.download.output_dir = Some(PathBuf::from(value)),
            "CLIPFETCH_QUALITY" => config.download.default_quality = value,
            "CLIPFETCH_LOG_LEVEL" => config.logging.level = value,
            _ => continue,
        }
        applied.push(*var);
    }
    applied
}

/// Apply global and per-command flags; returns how many settings changed
pub fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) -> usize {
    let mut overrides = 0;

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
        overrides += 1;
    }
    if cli.log_json {
        config.logging.json = true;
        overrides += 1;
    }

    let (quality, output_dir) = match &cli.command {
        Commands::Download(args) => (args.quality, args.output_dir.as_ref()),
        Commands::Clip(args) => (args.quality, args.output_dir.as_ref()),
        Commands::Qualities(_) => (None, None),
    };
    if let Some(quality) = quality {
        config.download.default_quality = quality.slug().to_string();
        overrides += 1;
    }
    if let Some(dir) = output_dir {
        config.download.output_dir = Some(dir.clone());
        overrides += 1;
    }

    overrides
}

/// Reject values that would otherwise fail late or silently
pub fn validate(config: &AppConfig) -> Result<(), ClipFetchError> {
    config.logging.validate()?;
    if Quality::parse(&config.download.default_quality).is_none() {
        return Err(ClipFetchError::InvalidConfigValue {
            key: "download.default_quality".to_string(),
            value: config.download.default_quality.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("clipfetch.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_file_then_env_then_cli() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[download]\noutput_dir = \"/from/file\"\ndefault_quality = \"480p\"\n\n[logging]\nlevel = \"warn\"\n",
        );
        let cli = Cli::parse_from([
            "clipfetch",
            "--config",
            path.to_str().unwrap(),
            "download",
            "https://youtu.be/abc",
            "-q",
            "1080p",
        ]);

        let (config, report) = resolve_configuration(
            &cli,
            env_from(&[("CLIPFETCH_OUTPUT_DIR", "/from/env"), ("CLIPFETCH_QUALITY", "720p")]),
        )
        .unwrap();

        assert_eq!(report.file, Some(path));
        assert_eq!(report.env_overrides, vec!["CLIPFETCH_OUTPUT_DIR", "CLIPFETCH_QUALITY"]);
        assert_eq!(report.cli_overrides, 1);
        assert_eq!(config.output_dir(), PathBuf::from("/from/env"));
        assert_eq!(config.download.default_quality, "1080p");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_cli_log_flags_win() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[logging]\nlevel = \"warn\"\n");
        let cli = Cli::parse_from([
            "clipfetch",
            "--config",
            path.to_str().unwrap(),
            "--log-level",
            "trace",
            "--log-json",
            "qualities",
        ]);

        let (config, _) = resolve_configuration(&cli, env_from(&[("CLIPFETCH_LOG_LEVEL", "error")])).unwrap();
        assert_eq!(config.logging.level, "trace");
        assert!(config.logging.json);
    }

    #[test]
    fn test_tool_paths_from_env() {
        let mut config = AppConfig::default();
        let applied = apply_environment_overrides(
            &mut config,
            env_from(&[("CLIPFETCH_FFMPEG", "/opt/ffmpeg"), ("CLIPFETCH_YTDLP", "  ")]),
        );
        assert_eq!(applied, vec!["CLIPFETCH_FFMPEG"]);
        assert_eq!(config.tools.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg")));
        assert_eq!(config.tools.ytdlp_path, None);
    }

    #[test]
    fn test_invalid_quality_in_env_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "");
        let cli = Cli::parse_from(["clipfetch", "--config", path.to_str().unwrap(), "qualities"]);
        let err = resolve_configuration(&cli, env_from(&[("CLIPFETCH_QUALITY", "8k")])).unwrap_err();
        assert!(format!("{:#}", err).contains("download.default_quality"));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let cli = Cli::parse_from(["clipfetch", "--config", "/definitely/not/here.toml", "qualities"]);
        assert!(resolve_configuration(&cli, env_from(&[])).is_err());
    }
}
