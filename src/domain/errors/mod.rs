// Domain errors - Error types for the domain layer

use std::fmt;

use thiserror::Error;

/// Failure category carried by a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad URL, bad time range or missing source; nothing external was started
    InvalidRequest,
    /// The remote-fetch engine reported an error
    FetchFailed,
    /// No media-transcode executable could be located
    ToolNotFound,
    /// The media-transcode executable exited unsuccessfully
    ToolFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidRequest => "invalid request",
            ErrorKind::FetchFailed => "download failed",
            ErrorKind::ToolNotFound => "tool not found",
            ErrorKind::ToolFailed => "tool failed",
        };
        f.write_str(name)
    }
}

/// Request rejected before any external resource was touched
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Neither a URL nor a local file was supplied
    #[error("Please enter a URL or select a local video file")]
    MissingSource,

    /// URL does not match a supported site pattern
    #[error("Unsupported URL: {0}. Please enter a valid YouTube or Google Drive URL")]
    UnsupportedUrl(String),

    /// Start is not before end
    #[error("Start time must be less than end time ({start}s >= {end}s)")]
    InvalidTimeRange { start: u32, end: u32 },

    /// A clip boundary lies beyond 23:59:59
    #[error("Time {0}s is out of range (maximum 23:59:59)")]
    TimeOutOfRange(u32),

    /// Local input file does not exist
    #[error("Input file not found: {0}")]
    FileNotFound(String),

    /// Local input file has no recognised video extension
    #[error("Not a video file: {0}")]
    NotAVideoFile(String),

    /// Local sources can only be clipped
    #[error("Local files can only be clipped; supply --start and --end")]
    LocalRequiresClip,

    /// Destination directory is missing
    #[error("Destination directory does not exist: {0}")]
    DestinationMissing(String),

    /// Malformed argument such as an unparseable time
    #[error("Bad arguments: {0}")]
    BadArgs(String),
}

/// Remote-fetch engine failure, carrying the engine's own message
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Local clip failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrimError {
    /// No ffmpeg executable in any probed location
    #[error("FFmpeg not found! Place ffmpeg next to this program or install it on PATH")]
    ToolNotFound,

    /// ffmpeg ran but exited non-zero; `stderr` is the complete error stream
    #[error("{stderr}")]
    ToolFailed { stderr: String },

    /// ffmpeg could not be started at all
    #[error("Failed to start {tool}: {message}")]
    SpawnFailed { tool: String, message: String },
}

impl TrimError {
    /// Map to the uniform failure category
    pub fn kind(&self) -> ErrorKind {
        match self {
            TrimError::ToolNotFound => ErrorKind::ToolNotFound,
            TrimError::ToolFailed { .. } | TrimError::SpawnFailed { .. } => ErrorKind::ToolFailed,
        }
    }
}
