//! yt-dlp execution adapter
//!
//! Translates a [`FetchConfig`] into yt-dlp command-line options, streams the
//! engine's line output into the progress normaliser and collects its error
//! stream in full for failure reporting.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::adapters::tool_locator::ToolLocator;
use crate::domain::errors::FetchError;
use crate::engine::progress::{ProgressNormalizer, RawProgress, RawSignal};
use crate::ports::{FetchConfig, FetchJob, FetchPort};

/// Prefix of the lines produced by our progress template
pub const PROGRESS_PREFIX: &str = "clipfetch-progress|";

/// Prefix of the line carrying the final file path
pub const OUTPUT_PREFIX: &str = "clipfetch-output|";

/// Progress template; missing fields are printed as `NA`
const PROGRESS_TEMPLATE: &str = "download:clipfetch-progress|%(progress.status)s|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s|%(progress._percent_str)s";

const OUTPUT_TEMPLATE: &str = "after_move:clipfetch-output|%(filepath)s";

/// yt-dlp subprocess adapter
pub struct YtDlpAdapter {
    locator: ToolLocator,
    ffmpeg: Option<ToolLocator>,
}

#[derive(Debug)]
enum StreamLine {
    Stdout(String),
    Stderr(String),
}

impl YtDlpAdapter {
    /// Create a new adapter; `ffmpeg` is passed to yt-dlp for merging when found
    pub fn new(locator: ToolLocator, ffmpeg: Option<ToolLocator>) -> Self {
        Self { locator, ffmpeg }
    }

    /// Command-line options equivalent to `config`, followed by the URL
    pub fn build_args(job: &FetchJob, ffmpeg_location: Option<&PathBuf>) -> Vec<OsString> {
        let config: &FetchConfig = &job.config;
        let mut args: Vec<OsString> = Vec::with_capacity(40);
        let mut push = |value: &str| args.push(OsString::from(value));

        push("--newline");
        push("--progress");
        push("--progress-template");
        push(PROGRESS_TEMPLATE);
        push("--print");
        push(OUTPUT_TEMPLATE);
        push("-f");
        push(&config.format);

        if let Some((start, end)) = config.download_range {
            push("--download-sections");
            push(&format!("*{}-{}", start, end));
        }
        if config.force_keyframes_at_cuts {
            push("--force-keyframes-at-cuts");
        }

        push("--merge-output-format");
        push(&config.merge_output_format);
        push("--concurrent-fragments");
        push(&config.concurrent_fragments.to_string());
        push("--fragment-retries");
        push(&config.fragment_retries.to_string());
        push("--retries");
        push(&config.retries.to_string());
        push(if config.write_subtitles { "--write-subs" } else { "--no-write-subs" });
        push(if config.write_auto_subs {
            "--write-auto-subs"
        } else {
            "--no-write-auto-subs"
        });
        push(if config.overwrites {
            "--force-overwrites"
        } else {
            "--no-overwrites"
        });
        for (postprocessor, pp_args) in &config.postprocessor_args {
            push("--postprocessor-args");
            push(&format!("{}:{}", postprocessor, pp_args.join(" ")));
        }

        if let Some(location) = ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(location.as_os_str().to_os_string());
        }

        args.push("-o".into());
        args.push(config.output_template.as_os_str().to_os_string());
        args.push("--".into());
        args.push(job.url.as_str().into());
        args
    }

    /// Parse one line of our progress template
    pub fn parse_progress_line(line: &str) -> Option<RawProgress> {
        let payload = line.trim().strip_prefix(PROGRESS_PREFIX)?;
        let mut fields = payload.splitn(5, '|');
        let status = fields.next()?.trim().to_string();
        let downloaded = fields.next().and_then(parse_count);
        let total = fields.next().and_then(parse_count);
        let estimate = fields.next().and_then(parse_count);
        let percent = fields.next().map(|v| v.to_string());
        let total = total.filter(|t| *t > 0).or(estimate);

        let signal = match (downloaded, total, percent) {
            (Some(downloaded), Some(total), _) if total > 0 => RawSignal::Bytes { downloaded, total },
            (_, _, Some(text)) => RawSignal::PercentText(text),
            _ => return None,
        };
        Some(RawProgress { status, signal })
    }

    /// Final file path from an `after_move` line
    pub fn parse_output_line(line: &str) -> Option<PathBuf> {
        let path = line.trim().strip_prefix(OUTPUT_PREFIX)?.trim();
        if path.is_empty() || path == "NA" {
            return None;
        }
        Some(PathBuf::from(path))
    }

    /// Failure message from the engine's error stream, verbatim
    pub fn failure_message(stderr_lines: &[String], exit: &str) -> String {
        let errors: Vec<&str> = stderr_lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| line.starts_with("ERROR:"))
            .collect();
        if !errors.is_empty() {
            return errors.join("\n");
        }
        stderr_lines
            .iter()
            .rev()
            .map(|line| line.trim())
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("yt-dlp exited with {}", exit))
    }
}

/// Byte counters print as integers, estimates sometimes as floats, missing ones as `NA`
fn parse_count(field: &str) -> Option<u64> {
    let field = field.trim();
    field
        .parse::<u64>()
        .ok()
        .or_else(|| field.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0).map(|v| v as u64))
}

/// Forward every line of `reader`, decoding lossily
fn forward_lines<R>(reader: R, tx: mpsc::UnboundedSender<StreamLine>, wrap: fn(String) -> StreamLine)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buffer).trim_end_matches(['\r', '\n']).to_string();
                    if tx.send(wrap(line)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read yt-dlp output: {}", e);
                    break;
                }
            }
        }
    });
}

#[async_trait]
impl FetchPort for YtDlpAdapter {
    async fn fetch(
        &self,
        job: &FetchJob,
        progress: &mut ProgressNormalizer,
    ) -> Result<Option<PathBuf>, FetchError> {
        let ytdlp = self
            .locator
            .locate()
            .ok_or_else(|| FetchError::new("yt-dlp not found. Install it or set tools.ytdlp_path"))?;
        let ffmpeg_location = self.ffmpeg.as_ref().and_then(ToolLocator::locate);
        let args = Self::build_args(job, ffmpeg_location.as_ref());

        info!("Fetching {} with format {}", job.url, job.config.format);
        if let Ok(config) = serde_json::to_string(&job.config) {
            debug!("Fetch configuration: {}", config);
        }
        debug!("Running {} {:?}", ytdlp.display(), args);

        let mut child = Command::new(&ytdlp)
            .args(&args)
            .env("PYTHONIOENCODING", "UTF-8")
            .env("PYTHONUTF8", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FetchError::new(format!("Failed to start yt-dlp: {}", e)))?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            forward_lines(stdout, tx.clone(), StreamLine::Stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            forward_lines(stderr, tx.clone(), StreamLine::Stderr);
        }
        drop(tx);

        let mut final_path = None;
        let mut stderr_lines = Vec::new();
        while let Some(line) = rx.recv().await {
            // Progress goes to stderr when yt-dlp runs quiet, so check both streams.
            let text = match &line {
                StreamLine::Stdout(text) | StreamLine::Stderr(text) => text,
            };
            if let Some(raw) = Self::parse_progress_line(text) {
                progress.observe(&raw);
                continue;
            }
            if let Some(path) = Self::parse_output_line(text) {
                debug!("yt-dlp wrote {}", path.display());
                final_path = Some(path);
                continue;
            }
            match line {
                StreamLine::Stdout(text) => debug!(target: "yt-dlp", "{}", text),
                StreamLine::Stderr(text) => {
                    debug!(target: "yt-dlp", "{}", text);
                    stderr_lines.push(text);
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| FetchError::new(format!("Failed while waiting for yt-dlp: {}", e)))?;

        if !status.success() {
            let message = Self::failure_message(&stderr_lines, &status.to_string());
            error!("yt-dlp failed: {}", message);
            return Err(FetchError::new(message));
        }

        Ok(final_path)
    }
}
