// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fetch_ytdlp;
pub mod system_clock;
pub mod toml_config;
pub mod tool_locator;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use fetch_ytdlp::YtDlpAdapter;
pub use system_clock::SystemClock;
pub use toml_config::{AppConfig, DownloadConfig, TomlConfigAdapter, ToolsConfig};
pub use tool_locator::{Candidate, ToolLocator};
