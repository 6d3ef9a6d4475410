//! clipfetch CLI
//!
//! Downloads videos or clips with yt-dlp, or trims local files with ffmpeg.
//!
//! # Usage
//!
//! ```bash
//! clipfetch download "https://www.youtube.com/watch?v=..." -q 1080p -d ~/Videos
//! clipfetch clip "https://youtu.be/..." --start 00:01:00 --end 00:02:00
//! clipfetch clip holiday.mkv --start 10 --end 25
//! clipfetch qualities
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use clipfetch::app::DefaultAppContainer;
use clipfetch::cli::{commands, Cli, Commands};
use clipfetch::config_initialization::initialize_configuration_hierarchy;
use clipfetch::utils::logging::init_logging;

/// Main entry point for the clipfetch CLI application
#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let cli = Cli::parse();

    let (config, report) = initialize_configuration_hierarchy(&cli)?;
    init_logging(&config.logging, cli.log_level.is_some())?;
    report.log();

    info!("Starting clipfetch {}", env!("CARGO_PKG_VERSION"));

    // Execute the requested command
    let result = match cli.command {
        Commands::Qualities(args) => {
            commands::qualities(args)?;
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Download(args) => {
            let container = DefaultAppContainer::new(&config);
            commands::download(args, &config, &container).await?
        }
        Commands::Clip(args) => {
            let container = DefaultAppContainer::new(&config);
            commands::clip(args, &config, &container).await?
        }
    };

    Ok(ExitCode::from(commands::report(&result)))
}
