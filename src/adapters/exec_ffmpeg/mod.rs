//! FFmpeg execution adapter
//!
//! Trims local files by running the ffmpeg executable: video is copied
//! byte-for-byte, audio is re-encoded to AAC so both download paths produce
//! the same audio track.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::adapters::tool_locator::ToolLocator;
use crate::domain::errors::TrimError;
use crate::ports::TrimPort;

/// FFmpeg-based trim adapter
pub struct FFmpegAdapter {
    locator: ToolLocator,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter using the given locator
    pub fn new(locator: ToolLocator) -> Self {
        Self { locator }
    }

    /// Locator used to find ffmpeg
    pub fn locator(&self) -> &ToolLocator {
        &self.locator
    }

    /// Resolve the executable, or `TrimError::ToolNotFound`
    pub fn executable(&self) -> Result<PathBuf, TrimError> {
        self.locator.locate().ok_or(TrimError::ToolNotFound)
    }

    /// Argument list for cutting `[start, end)` out of `input`
    pub fn build_trim_args(input: &Path, output: &Path, start: u32, end: u32) -> Vec<OsString> {
        let duration = end.saturating_sub(start);
        let mut args: Vec<OsString> = Vec::with_capacity(16);
        args.push("-i".into());
        args.push(input.as_os_str().to_os_string());
        args.push("-ss".into());
        args.push(start.to_string().into());
        args.push("-t".into());
        args.push(duration.to_string().into());
        args.extend(["-c:v", "copy", "-c:a", "aac", "-b:a", "192k"].map(OsString::from));
        args.push("-avoid_negative_ts".into());
        args.push("make_zero".into());
        args.push(output.as_os_str().to_os_string());
        args.push("-y".into());
        args
    }
}

#[async_trait]
impl TrimPort for FFmpegAdapter {
    async fn trim(&self, input: &Path, output: &Path, start: u32, end: u32) -> Result<(), TrimError> {
        let ffmpeg = self.executable()?;
        let args = Self::build_trim_args(input, output, start, end);
        info!(
            "Trimming {} [{}s, {}s) -> {}",
            input.display(),
            start,
            end,
            output.display()
        );
        debug!("Running {} {:?}", ffmpeg.display(), args);

        let result = Command::new(&ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| TrimError::SpawnFailed {
                tool: ffmpeg.display().to_string(),
                message: e.to_string(),
            })?;

        if result.status.success() {
            debug!("ffmpeg finished with {}", result.status);
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&result.stderr).trim_end().to_string();
        error!("ffmpeg exited with {}", result.status);
        Err(TrimError::ToolFailed { stderr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tool_locator::Candidate;

    fn as_strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_trim_args_layout() {
        let args = FFmpegAdapter::build_trim_args(Path::new("in.mkv"), Path::new("out.mp4"), 10, 25);
        assert_eq!(
            as_strings(&args),
            vec![
                "-i", "in.mkv", "-ss", "10", "-t", "15", "-c:v", "copy", "-c:a", "aac", "-b:a", "192k",
                "-avoid_negative_ts", "make_zero", "out.mp4", "-y",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_tool_is_reported() {
        let adapter = FFmpegAdapter::new(ToolLocator::new(
            "ffmpeg",
            vec![Candidate::Explicit(PathBuf::from("/nonexistent/ffmpeg"))],
        ));
        let err = adapter
            .trim(Path::new("in.mp4"), Path::new("out.mp4"), 0, 1)
            .await
            .unwrap_err();
        assert_eq!(err, TrimError::ToolNotFound);
    }
}
