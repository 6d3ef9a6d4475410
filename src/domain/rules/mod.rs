// Domain rules - Request validation and output naming policies

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::errors::DomainError;
use crate::domain::model::*;

/// Streaming host, with or without scheme and `www`, including short-link and no-cookie hosts
static STREAMING_HOST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube|youtu|youtube-nocookie)\.(com|be)/")
        .expect("streaming host regex")
});

/// Document-sharing host, two specific subdomains
static SHARING_HOST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?(drive\.google\.com|docs\.google\.com)").expect("sharing host regex")
});

/// Extensions accepted for local inputs
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v"];

/// Structural request checks, no network and no side effects
pub struct RequestValidator;

impl RequestValidator {
    /// True if the URL matches a supported site pattern
    pub fn validate_url(url: &str) -> bool {
        STREAMING_HOST_RE.is_match(url) || SHARING_HOST_RE.is_match(url)
    }

    /// True iff `start < end`
    pub fn validate_time_range(start: u32, end: u32) -> bool {
        start < end
    }

    /// True if the path carries a recognised video extension
    pub fn is_video_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| VIDEO_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    /// Full check of a request before anything external runs
    pub fn validate_request(request: &DownloadRequest) -> Result<(), DomainError> {
        match &request.source {
            Source::RemoteUrl(url) => {
                let url = url.trim();
                if url.is_empty() {
                    return Err(DomainError::MissingSource);
                }
                if !Self::validate_url(url) {
                    return Err(DomainError::UnsupportedUrl(url.to_string()));
                }
            }
            Source::LocalFile(path) => {
                if path.as_os_str().is_empty() {
                    return Err(DomainError::MissingSource);
                }
                if !path.is_file() {
                    return Err(DomainError::FileNotFound(path.display().to_string()));
                }
                if !Self::is_video_file(path) {
                    return Err(DomainError::NotAVideoFile(path.display().to_string()));
                }
                if request.mode == Mode::FullVideo {
                    return Err(DomainError::LocalRequiresClip);
                }
            }
        }

        if let Mode::Clip {
            start_seconds,
            end_seconds,
        } = request.mode
        {
            if !Self::validate_time_range(start_seconds, end_seconds) {
                return Err(DomainError::InvalidTimeRange {
                    start: start_seconds,
                    end: end_seconds,
                });
            }
            if end_seconds > MAX_CLIP_SECONDS {
                return Err(DomainError::TimeOutOfRange(end_seconds));
            }
        }

        if !request.destination_dir.is_dir() {
            return Err(DomainError::DestinationMissing(
                request.destination_dir.display().to_string(),
            ));
        }

        Ok(())
    }
}

/// Output filename derivation
///
/// Local clips get an existence-checked name. Remote fetches only get a
/// template whose final name the engine fills in, so their uniqueness rests
/// on the timestamp alone. Both paths accept the race between the check and
/// the file actually being created.
pub struct NamingPolicy;

impl NamingPolicy {
    /// Suffix encoding the operation shape
    pub fn clip_suffix(start: u32, end: u32) -> String {
        format!("clip_{}s_to_{}s", start, end)
    }

    /// First free `{base}_{suffix}_{timestamp}[_{n}].{ext}` in `dir`
    pub fn make_unique_name(dir: &Path, base: &str, suffix: &str, timestamp: i64, ext: &str) -> PathBuf {
        let stem = if suffix.is_empty() {
            format!("{}_{}", base, timestamp)
        } else {
            format!("{}_{}_{}", base, suffix, timestamp)
        };

        let mut candidate = dir.join(format!("{}.{}", stem, ext));
        let mut counter: u32 = 1;
        while candidate.exists() {
            candidate = dir.join(format!("{}_{}.{}", stem, counter, ext));
            counter += 1;
        }
        candidate
    }

    /// Output path for a local clip of `input`
    pub fn local_clip_path(dir: &Path, input: &Path, start: u32, end: u32, timestamp: i64) -> PathBuf {
        let base = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "clip".to_string());
        Self::make_unique_name(dir, &base, &Self::clip_suffix(start, end), timestamp, "mp4")
    }

    /// Output template for the remote-fetch engine; title and extension are filled in at fetch time
    pub fn remote_template(dir: &Path, mode: &Mode, timestamp: i64) -> PathBuf {
        let file_name = match mode.window() {
            Some((start, end)) => format!("{}_{}.%(ext)s", Self::clip_suffix(start, end), timestamp),
            None => format!("%(title)s_{}.%(ext)s", timestamp),
        };
        dir.join(file_name)
    }
}
