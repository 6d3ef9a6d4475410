//! CLI module for clipfetch
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// clipfetch
///
/// Download a video or a time-bounded clip of it with yt-dlp, or cut a clip
/// out of a local file with ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "clipfetch")]
#[command(about = "Download videos and clips, or trim local files")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (overrides config, CLIPFETCH_LOG_LEVEL and RUST_LOG)
    #[arg(
        long,
        global = true,
        value_parser = clap::builder::PossibleValuesParser::new(["error", "warn", "info", "debug", "trace"])
    )]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (default: ./clipfetch.toml, then the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a whole video
    Download(args::DownloadArgs),
    /// Download a clip of a video, or trim a local file
    Clip(args::ClipArgs),
    /// List the quality presets
    Qualities(args::QualitiesArgs),
}
