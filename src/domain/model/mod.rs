// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::errors::{DomainError, ErrorKind};

/// Largest clip boundary the hour/minute/second inputs can express (23:59:59)
pub const MAX_CLIP_SECONDS: u32 = 86_399;

/// Time of day style position inside a video, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeSpec {
    pub seconds: u32,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    /// Create a new TimeSpec from hours, minutes and seconds
    pub fn from_components(hours: u32, minutes: u32, seconds: u32) -> Result<Self, DomainError> {
        if hours > 23 {
            return Err(DomainError::BadArgs("Hours must be between 0 and 23".to_string()));
        }
        if minutes > 59 {
            return Err(DomainError::BadArgs("Minutes must be between 0 and 59".to_string()));
        }
        if seconds > 59 {
            return Err(DomainError::BadArgs("Seconds must be between 0 and 59".to_string()));
        }
        Ok(Self {
            seconds: hours * 3600 + minutes * 60 + seconds,
        })
    }

    /// Parse `SS`, `MM:SS` or `HH:MM:SS`
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();
        let parts: Vec<&str> = trimmed.split(':').collect();

        let number = |part: &str, what: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| DomainError::BadArgs(format!("Invalid {} in '{}'", what, trimmed)))
        };

        match parts.as_slice() {
            [secs] => {
                let seconds = number(secs, "seconds")?;
                if seconds > MAX_CLIP_SECONDS {
                    return Err(DomainError::TimeOutOfRange(seconds));
                }
                Ok(Self::from_seconds(seconds))
            }
            [mins, secs] => {
                // `MM:SS` may run past the hour, up to 1439:59
                let minutes = number(mins, "minutes")?;
                let seconds = number(secs, "seconds")?;
                if seconds > 59 {
                    return Err(DomainError::BadArgs("Seconds must be between 0 and 59".to_string()));
                }
                if minutes > MAX_CLIP_SECONDS / 60 {
                    return Err(DomainError::BadArgs(format!(
                        "Minutes must be between 0 and {}",
                        MAX_CLIP_SECONDS / 60
                    )));
                }
                Ok(Self::from_seconds(minutes * 60 + seconds))
            }
            [hours, mins, secs] => Self::from_components(
                number(hours, "hours")?,
                number(mins, "minutes")?,
                number(secs, "seconds")?,
            ),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid time format '{}'. Supported formats: SS, MM:SS, HH:MM:SS",
                trimmed
            ))),
        }
    }

    /// Format as HH:MM:SS
    pub fn format_hms(&self) -> String {
        let hours = self.seconds / 3600;
        let minutes = (self.seconds % 3600) / 60;
        let seconds = self.seconds % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// Where the video comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    RemoteUrl(String),
    LocalFile(PathBuf),
}

impl Source {
    pub fn is_remote(&self) -> bool {
        matches!(self, Source::RemoteUrl(_))
    }
}

/// Whole video or a `[start, end)` window of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    FullVideo,
    Clip { start_seconds: u32, end_seconds: u32 },
}

impl Mode {
    /// Build a clip window from parsed boundaries
    pub fn clip(start: TimeSpec, end: TimeSpec) -> Self {
        Mode::Clip {
            start_seconds: start.seconds,
            end_seconds: end.seconds,
        }
    }

    /// Clip window, if any
    pub fn window(&self) -> Option<(u32, u32)> {
        match *self {
            Mode::FullVideo => None,
            Mode::Clip {
                start_seconds,
                end_seconds,
            } => Some((start_seconds, end_seconds)),
        }
    }
}

/// Quality catalog entry
///
/// Every video entry excludes AV1 through a `vcodec!*=av01` filter; audio is
/// normalised to AAC at output by the post-processing step, never here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quality {
    #[default]
    Best,
    P2160,
    P1440,
    P1080,
    P720,
    P480,
    P360,
    AudioOnly,
    Worst,
}

/// Codec filter applied to every video-bearing expression
pub const AV1_EXCLUSION: &str = "[vcodec!*=av01]";

impl Quality {
    const ALL: [Quality; 9] = [
        Quality::Best,
        Quality::P2160,
        Quality::P1440,
        Quality::P1080,
        Quality::P720,
        Quality::P480,
        Quality::P360,
        Quality::AudioOnly,
        Quality::Worst,
    ];

    /// Catalog in display order
    pub fn all() -> &'static [Quality] {
        &Self::ALL
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Quality::Best => "Best Quality (Auto)",
            Quality::P2160 => "2160p 4K",
            Quality::P1440 => "1440p",
            Quality::P1080 => "1080p FHD",
            Quality::P720 => "720p HD",
            Quality::P480 => "480p SD",
            Quality::P360 => "360p SD",
            Quality::AudioOnly => "Audio Only",
            Quality::Worst => "Worst (Smallest)",
        }
    }

    /// Short name accepted on the command line
    pub fn slug(&self) -> &'static str {
        match self {
            Quality::Best => "best",
            Quality::P2160 => "2160p",
            Quality::P1440 => "1440p",
            Quality::P1080 => "1080p",
            Quality::P720 => "720p",
            Quality::P480 => "480p",
            Quality::P360 => "360p",
            Quality::AudioOnly => "audio",
            Quality::Worst => "worst",
        }
    }

    /// Height ceiling, `None` for uncapped entries
    pub fn height_cap(&self) -> Option<u32> {
        match self {
            Quality::P2160 => Some(2160),
            Quality::P1440 => Some(1440),
            Quality::P1080 => Some(1080),
            Quality::P720 => Some(720),
            Quality::P480 => Some(480),
            Quality::P360 => Some(360),
            Quality::Best | Quality::AudioOnly | Quality::Worst => None,
        }
    }

    /// Format-selection expression for the remote-fetch engine
    pub fn resolve(&self) -> &'static str {
        match self {
            Quality::Best => "(bv+ba/b)[vcodec!*=av01]",
            Quality::P2160 => "(bv[height<=2160]+ba/b)[vcodec!*=av01]",
            Quality::P1440 => "(bv[height<=1440]+ba/b)[vcodec!*=av01]",
            Quality::P1080 => "(bv[height<=1080]+ba/b)[vcodec!*=av01]",
            Quality::P720 => "(bv[height<=720]+ba/b)[vcodec!*=av01]",
            Quality::P480 => "(bv[height<=480]+ba/b)[vcodec!*=av01]",
            Quality::P360 => "(bv[height<=360]+ba/b)[vcodec!*=av01]",
            Quality::AudioOnly => "bestaudio/best",
            Quality::Worst => "worst[vcodec!*=av01]",
        }
    }

    /// Look up by label or slug; unknown names fall back to `Quality::Best`
    pub fn from_label(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            tracing::warn!("Unknown quality '{}', falling back to {}", name, Quality::Best.label());
            Quality::Best
        })
    }

    /// Strict lookup by label or slug, case-insensitive
    pub fn parse(name: &str) -> Option<Self> {
        let wanted = name.trim();
        Self::ALL.iter().copied().find(|quality| {
            quality.label().eq_ignore_ascii_case(wanted) || quality.slug().eq_ignore_ascii_case(wanted)
        })
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One user request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub source: Source,
    pub mode: Mode,
    pub quality: Quality,
    pub destination_dir: PathBuf,
}

impl DownloadRequest {
    /// Full-video request for a remote URL at best quality
    pub fn remote(url: impl Into<String>, destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::RemoteUrl(url.into()),
            mode: Mode::FullVideo,
            quality: Quality::Best,
            destination_dir: destination_dir.into(),
        }
    }

    /// Request for a local file; callers still need `with_clip`
    pub fn local(path: impl Into<PathBuf>, destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::LocalFile(path.into()),
            mode: Mode::FullVideo,
            quality: Quality::Best,
            destination_dir: destination_dir.into(),
        }
    }

    pub fn with_clip(mut self, start_seconds: u32, end_seconds: u32) -> Self {
        self.mode = Mode::Clip {
            start_seconds,
            end_seconds,
        };
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }
}

/// Normalised progress as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub percent: f64,
    pub status_text: String,
}

impl ProgressEvent {
    pub fn new(percent: f64, status_text: impl Into<String>) -> Self {
        Self {
            percent,
            status_text: status_text.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.percent >= 100.0
    }

    /// Progress bar caption
    pub fn display_text(&self) -> String {
        if self.is_complete() {
            format!("Download Complete ({:.1}%)", self.percent)
        } else {
            format!("Download Progress ({:.1}%)", self.percent)
        }
    }
}

/// Outcome of one submission
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    Success(PathBuf),
    Failure { kind: ErrorKind, message: String },
}

impl OperationResult {
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        OperationResult::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            OperationResult::Success(path) => Some(path),
            OperationResult::Failure { .. } => None,
        }
    }
}
