// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::progress::ProgressNormalizer;

/// Ffmpeg arguments the remote path applies after merging
pub const AUDIO_NORMALIZE_ARGS: [&str; 6] = ["-c:v", "copy", "-c:a", "aac", "-b:a", "192k"];

/// Receives normalised progress events; must never block the caller
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Configuration handed to the remote-fetch engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchConfig {
    pub format: String,
    pub output_template: PathBuf,
    /// Half-open `[start, end)` window, set only for clips
    pub download_range: Option<(u32, u32)>,
    pub force_keyframes_at_cuts: bool,
    pub merge_output_format: String,
    pub concurrent_fragments: u32,
    pub fragment_retries: u32,
    pub retries: u32,
    pub write_subtitles: bool,
    pub write_auto_subs: bool,
    pub overwrites: bool,
    /// Post-processor arguments keyed by post-processor name
    pub postprocessor_args: Vec<(String, Vec<String>)>,
}

impl FetchConfig {
    /// Engine configuration for one request
    pub fn for_request(format: &str, output_template: PathBuf, mode: &Mode) -> Self {
        let download_range = mode.window();
        Self {
            format: format.to_string(),
            output_template,
            download_range,
            force_keyframes_at_cuts: download_range.is_some(),
            merge_output_format: "mp4".to_string(),
            concurrent_fragments: 4,
            fragment_retries: 10,
            retries: 10,
            write_subtitles: false,
            write_auto_subs: false,
            overwrites: true,
            postprocessor_args: vec![(
                "ffmpeg".to_string(),
                AUDIO_NORMALIZE_ARGS.iter().map(|arg| arg.to_string()).collect(),
            )],
        }
    }
}

/// One remote fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchJob {
    pub url: String,
    pub config: FetchConfig,
}

/// Port for the remote-fetch engine
#[async_trait]
pub trait FetchPort: Send + Sync {
    /// Run the fetch to completion, feeding progress into `progress`.
    /// Returns the final file path when the engine reports one.
    async fn fetch(
        &self,
        job: &FetchJob,
        progress: &mut ProgressNormalizer,
    ) -> Result<Option<PathBuf>, FetchError>;
}

/// Port for local trimming with the media-transcode tool
#[async_trait]
pub trait TrimPort: Send + Sync {
    /// Cut `[start, end)` out of `input` into `output`
    async fn trim(&self, input: &Path, output: &Path, start: u32, end: u32) -> Result<(), TrimError>;
}

/// Port for the wall clock used in output names
pub trait ClockPort: Send + Sync {
    /// Seconds since the Unix epoch
    fn unix_timestamp(&self) -> i64;
}
