//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::domain::model::{Quality, TimeSpec};

/// Arguments for the download command
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Video URL (YouTube or Google Drive)
    pub url: String,

    /// Quality preset; see `clipfetch qualities`
    #[arg(short, long, value_parser = parse_quality)]
    pub quality: Option<Quality>,

    /// Destination directory (must exist)
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the clip command
#[derive(Args, Debug)]
pub struct ClipArgs {
    /// Video URL, or path to a local video file
    pub source: String,

    /// Start time (HH:MM:SS, MM:SS or seconds; minutes in MM:SS may exceed 59)
    #[arg(short, long, value_parser = parse_time)]
    pub start: TimeSpec,

    /// End time (HH:MM:SS, MM:SS or seconds)
    #[arg(short, long, value_parser = parse_time)]
    pub end: TimeSpec,

    /// Quality preset for URLs; ignored for local files
    #[arg(short, long, value_parser = parse_quality)]
    pub quality: Option<Quality>,

    /// Destination directory (must exist)
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the qualities command
#[derive(Args, Debug)]
pub struct QualitiesArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

/// Accepts a slug (`720p`) or a full label (`720p HD`)
pub fn parse_quality(value: &str) -> Result<Quality, String> {
    Quality::parse(value).ok_or_else(|| {
        let known: Vec<&str> = Quality::all().iter().map(|q| q.slug()).collect();
        format!("unknown quality '{}' (expected one of: {})", value, known.join(", "))
    })
}

pub fn parse_time(value: &str) -> Result<TimeSpec, String> {
    TimeSpec::parse(value).map_err(|e| e.to_string())
}
