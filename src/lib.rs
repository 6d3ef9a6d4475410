//! clipfetch library
//!
//! Downloads a remote video or a time-bounded clip of it through yt-dlp, or
//! trims a clip out of a local file with ffmpeg. Both paths report progress as
//! one non-regressing 0-100 stream and never overwrite an existing file.
//!
//! The entry point is [`DownloadInteractor::submit`]; [`DefaultAppContainer`]
//! wires it to the real tools.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use adapters::AppConfig;
pub use app::{AppContainer, DefaultAppContainer, DownloadInteractor};
pub use domain::errors::{DomainError, ErrorKind, FetchError, TrimError};
pub use domain::model::{DownloadRequest, Mode, OperationResult, ProgressEvent, Quality, Source, TimeSpec};
pub use error::{ClipFetchError, ClipFetchResult};
pub use ports::ProgressSink;
