use std::sync::Arc;

use tracing::debug;

use crate::adapters::{AppConfig, FFmpegAdapter, SystemClock, ToolLocator, YtDlpAdapter};
use crate::app::download_interactor::DownloadInteractor;
use crate::ports::{ClockPort, FetchPort, TrimPort};

pub trait AppContainer: Send + Sync {
    fn download_interactor(&self) -> Arc<DownloadInteractor>;
}

pub struct DefaultAppContainer {
    download_interactor: Arc<DownloadInteractor>,
}

impl DefaultAppContainer {
    /// Wire the real adapters from configuration
    pub fn new(config: &AppConfig) -> Self {
        let ffmpeg_locator = ToolLocator::standard("ffmpeg", config.tools.ffmpeg_path.clone());
        let ytdlp_locator = ToolLocator::standard("yt-dlp", config.tools.ytdlp_path.clone());
        debug!(
            "Tool candidates: ffmpeg {:?}, yt-dlp {:?}",
            ffmpeg_locator.candidates(),
            ytdlp_locator.candidates()
        );

        let fetch_port = Arc::new(YtDlpAdapter::new(ytdlp_locator, Some(ffmpeg_locator.clone())));
        let trim_port = Arc::new(FFmpegAdapter::new(ffmpeg_locator));
        let clock_port = Arc::new(SystemClock::new());

        let download_interactor = Arc::new(DownloadInteractor::new(
            fetch_port as Arc<dyn FetchPort>,
            trim_port as Arc<dyn TrimPort>,
            clock_port as Arc<dyn ClockPort>,
        ));

        Self { download_interactor }
    }
}

impl AppContainer for DefaultAppContainer {
    fn download_interactor(&self) -> Arc<DownloadInteractor> {
        Arc::clone(&self.download_interactor)
    }
}
