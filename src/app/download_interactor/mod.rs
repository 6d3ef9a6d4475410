// Download interactor - Orchestrates remote downloads and local clipping

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, info_span, warn, Instrument};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::engine::progress::ProgressNormalizer;
use crate::ports::*;

/// Status shown when a remote operation succeeds
pub const REMOTE_DONE_TEXT: &str = "Download completed!";

/// Status shown when a local clip succeeds
pub const LOCAL_DONE_TEXT: &str = "Clip created successfully!";

/// Interactor for the download and clip use cases
pub struct DownloadInteractor {
    fetch_port: Arc<dyn FetchPort>,
    trim_port: Arc<dyn TrimPort>,
    clock_port: Arc<dyn ClockPort>,
}

impl DownloadInteractor {
    /// Create new download interactor with injected ports
    pub fn new(fetch_port: Arc<dyn FetchPort>, trim_port: Arc<dyn TrimPort>, clock_port: Arc<dyn ClockPort>) -> Self {
        Self {
            fetch_port,
            trim_port,
            clock_port,
        }
    }

    /// Run one request to completion, reporting progress into `sink`.
    ///
    /// Never panics on bad input: every failure comes back as
    /// [`OperationResult::Failure`]. A failed run may leave a partial file at
    /// the chosen output path.
    pub async fn submit(&self, request: DownloadRequest, sink: Arc<dyn ProgressSink>) -> OperationResult {
        let source_kind = if request.source.is_remote() { "remote" } else { "local" };
        let span = info_span!("submit", source = source_kind, mode = ?request.mode);
        self.run(request, sink).instrument(span).await
    }

    async fn run(&self, request: DownloadRequest, sink: Arc<dyn ProgressSink>) -> OperationResult {
        if let Err(e) = RequestValidator::validate_request(&request) {
            warn!("Rejected request: {}", e);
            return OperationResult::failure(ErrorKind::InvalidRequest, e.to_string());
        }

        let mut progress = ProgressNormalizer::new(sink);
        let timestamp = self.clock_port.unix_timestamp();

        let result = match &request.source {
            Source::RemoteUrl(url) => {
                self.fetch_remote(url, &request, timestamp, &mut progress).await
            }
            Source::LocalFile(input) => match request.mode.window() {
                Some((start, end)) => {
                    self.clip_local(input, start, end, &request.destination_dir, timestamp, &mut progress)
                        .await
                }
                // validate_request already rejects this combination
                None => OperationResult::failure(ErrorKind::InvalidRequest, DomainError::LocalRequiresClip.to_string()),
            },
        };

        match &result {
            OperationResult::Success(path) => info!("Saved to {}", path.display()),
            OperationResult::Failure { kind, message } => error!("Operation failed ({}): {}", kind, message),
        }
        result
    }

    async fn fetch_remote(
        &self,
        url: &str,
        request: &DownloadRequest,
        timestamp: i64,
        progress: &mut ProgressNormalizer,
    ) -> OperationResult {
        let format = request.quality.resolve();
        let template = NamingPolicy::remote_template(&request.destination_dir, &request.mode, timestamp);
        info!("Fetching {} at {} into {}", url, request.quality, template.display());

        let job = FetchJob {
            url: url.to_string(),
            config: FetchConfig::for_request(format, template.clone(), &request.mode),
        };

        match self.fetch_port.fetch(&job, progress).await {
            Ok(reported) => {
                progress.finish(REMOTE_DONE_TEXT);
                let path = reported.unwrap_or(template);
                OperationResult::Success(path)
            }
            Err(e) => OperationResult::failure(ErrorKind::FetchFailed, e.message),
        }
    }

    async fn clip_local(
        &self,
        input: &Path,
        start: u32,
        end: u32,
        destination_dir: &Path,
        timestamp: i64,
        progress: &mut ProgressNormalizer,
    ) -> OperationResult {
        let output: PathBuf = NamingPolicy::local_clip_path(destination_dir, input, start, end, timestamp);
        info!("Clipping {} [{}s, {}s) into {}", input.display(), start, end, output.display());

        progress.processing(format!("Processing clip ({}s to {}s)...", start, end));

        match self.trim_port.trim(input, &output, start, end).await {
            Ok(()) => {
                progress.finish(LOCAL_DONE_TEXT);
                OperationResult::Success(output)
            }
            Err(e) => OperationResult::failure(e.kind(), e.to_string()),
        }
    }
}
