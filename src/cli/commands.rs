//! Command implementations

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::adapters::AppConfig;
use crate::app::container::AppContainer;
use crate::app::download_interactor::DownloadInteractor;
use crate::cli::args::{ClipArgs, DownloadArgs, QualitiesArgs};
use crate::domain::model::{DownloadRequest, Mode, OperationResult, ProgressEvent, Quality};
use crate::domain::rules::RequestValidator;

const BAR_WIDTH: usize = 30;

/// Execute the download command
pub async fn download(args: DownloadArgs, config: &AppConfig, container: &dyn AppContainer) -> Result<OperationResult> {
    info!("Starting download of {}", args.url);
    let request = DownloadRequest::remote(args.url, output_dir(args.output_dir, config))
        .with_quality(quality(args.quality, config));
    run(container.download_interactor(), request).await
}

/// Execute the clip command
pub async fn clip(args: ClipArgs, config: &AppConfig, container: &dyn AppContainer) -> Result<OperationResult> {
    info!("Starting clip of {} ({} to {})", args.source, args.start, args.end);
    let destination = output_dir(args.output_dir, config);
    let request = if looks_remote(&args.source) {
        DownloadRequest::remote(args.source, destination).with_quality(quality(args.quality, config))
    } else {
        DownloadRequest::local(PathBuf::from(args.source), destination)
    }
    .with_mode(Mode::clip(args.start, args.end));
    run(container.download_interactor(), request).await
}

/// One catalog row as printed by `qualities --json`
#[derive(Debug, Serialize)]
pub struct QualityEntry {
    pub slug: &'static str,
    pub label: &'static str,
    pub format: &'static str,
}

pub fn quality_entries() -> Vec<QualityEntry> {
    Quality::all()
        .iter()
        .map(|quality| QualityEntry {
            slug: quality.slug(),
            label: quality.label(),
            format: quality.resolve(),
        })
        .collect()
}

/// Execute the qualities command
pub fn qualities(args: QualitiesArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &quality_entries()).context("Failed to serialize quality catalog")?;
        writeln!(out).context("Failed to write to stdout")?;
        return Ok(());
    }
    for quality in Quality::all() {
        writeln!(out, "{:<8} {:<22} {}", quality.slug(), quality.label(), quality.resolve())
            .context("Failed to write to stdout")?;
    }
    Ok(())
}

/// Print the final result; returns the process exit code
pub fn report(result: &OperationResult) -> u8 {
    match result {
        OperationResult::Success(path) => {
            println!("{}", path.display());
            0
        }
        OperationResult::Failure { kind, message } => {
            eprintln!("Error ({}): {}", kind, message);
            1
        }
    }
}

/// URL-shaped sources go to the remote path, everything else is a local file
pub fn looks_remote(source: &str) -> bool {
    source.contains("://") || RequestValidator::validate_url(source)
}

fn output_dir(from_cli: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    from_cli.unwrap_or_else(|| config.output_dir())
}

fn quality(from_cli: Option<Quality>, config: &AppConfig) -> Quality {
    from_cli.unwrap_or_else(|| Quality::from_label(&config.download.default_quality))
}

/// Submit on a worker task and render progress here until it finishes
async fn run(interactor: Arc<DownloadInteractor>, request: DownloadRequest) -> Result<OperationResult> {
    debug!("Submitting {:?}", request);
    let (tx, mut rx) = mpsc::unbounded_channel::<ProgressEvent>();
    let worker = tokio::spawn(async move { interactor.submit(request, Arc::new(tx)).await });

    let mut drawn = false;
    while let Some(event) = rx.recv().await {
        render(&event);
        drawn = true;
    }
    if drawn {
        eprintln!();
    }

    worker.await.context("Download worker stopped unexpectedly")
}

fn render(event: &ProgressEvent) {
    let filled = ((event.percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
    let mut err = io::stderr().lock();
    // Progress drawing is best effort; a closed stderr must not fail the download
    let _ = write!(err, "\r\x1b[2K[{}] {}  {}", bar, event.display_text(), event.status_text);
    let _ = err.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_remote() {
        assert!(looks_remote("https://youtu.be/abc"));
        assert!(looks_remote("youtube.com/watch?v=abc"));
        assert!(looks_remote("https://example.com/video"));
        assert!(!looks_remote("videos/holiday.mp4"));
        assert!(!looks_remote("C:\\videos\\holiday.mp4"));
    }

    #[test]
    fn test_config_fallbacks() {
        let mut config = AppConfig::default();
        config.download.default_quality = "480p".to_string();
        config.download.output_dir = Some(PathBuf::from("/videos"));

        assert_eq!(quality(None, &config), Quality::P480);
        assert_eq!(quality(Some(Quality::Worst), &config), Quality::Worst);
        assert_eq!(output_dir(None, &config), PathBuf::from("/videos"));
        assert_eq!(output_dir(Some(PathBuf::from("out")), &config), PathBuf::from("out"));
    }

    #[test]
    fn test_quality_entries_serialize() {
        let json = serde_json::to_value(quality_entries()).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), Quality::all().len());
        assert_eq!(rows[0]["slug"], "best");
        assert_eq!(rows[7]["format"], "bestaudio/best");
    }

    #[test]
    fn test_report_exit_codes() {
        assert_eq!(report(&OperationResult::Success(PathBuf::from("a.mp4"))), 0);
        assert_eq!(
            report(&OperationResult::failure(
                crate::domain::errors::ErrorKind::InvalidRequest,
                "bad"
            )),
            1
        );
    }
}
