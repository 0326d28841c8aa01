//! Socialcard - social media preview card generator.

mod adapters;
mod cassette;
mod cli;
mod config;
mod context;
mod download;
mod error;
mod factory;
mod layout;
mod output;
mod paths;
mod ports;
mod raster;
mod text;

use std::io::Write;
use std::path::Path;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::download::Downloads;
use crate::error::CardError;
use crate::factory::{CardRequest, ImageFactory};
use crate::output::resolve_output_path;
use crate::ports::{DownloadProgress, ProgressFn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "socialcard=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

/// Progress callback: a live percentage line when verbose, trace events otherwise.
fn progress_reporter(verbose: bool) -> ProgressFn {
    if verbose {
        return Arc::new(|p: &DownloadProgress| {
            let mut stderr = std::io::stderr().lock();
            let _ = match p.percent() {
                Some(100) => writeln!(stderr, "\rDownloading {}: 100%", p.url),
                Some(pct) => write!(stderr, "\rDownloading {}: {pct}%", p.url),
                None => write!(stderr, "\rDownloading {}: {} bytes", p.url, p.received),
            };
        });
    }
    Arc::new(|p: &DownloadProgress| {
        tracing::trace!(url = %p.url, received = p.received, total = ?p.total, "download progress");
    })
}

async fn run(cli: Cli) -> Result<(), CardError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(CardError::Config)?;
    tracing::debug!(config = %config_path.display(), "configuration loaded");

    let description = cli.resolve_description()?;

    if cli.width == Some(0) {
        return Err(CardError::InvalidArgument("--width must be positive".to_string()));
    }

    let request = CardRequest {
        title: cli.title.clone(),
        description,
        art: cli.art.clone(),
        thumbnail: cli.image.clone(),
        tags: cli.tags.clone(),
        width: cli.width,
        output: resolve_output_path(cli.output.as_deref()),
    };

    // Create context based on mode (live / recording / replaying)
    let replay_path = std::env::var("SOCIALCARD_REPLAY").ok();
    let is_recording = std::env::var("SOCIALCARD_REC").is_ok_and(|v| v == "true" || v == "1");
    let progress = progress_reporter(cli.verbose);

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        tracing::debug!(cassette = %cassette_path, "replaying downloads");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        tracing::debug!("recording downloads");
        let (ctx, session) = ServiceContext::recording(Some(progress));
        (ctx, Some(session))
    } else {
        (ServiceContext::live(Some(progress)), None)
    };

    let mut factory = ImageFactory::from_config(&config)?;
    let downloads = Downloads::new(config.download_dir());
    let result = factory.generate(ctx.downloader.as_ref(), downloads, &request).await;
    if result.is_err() {
        tracing::debug!(stage = ?factory.stage(), "pipeline stopped");
    } else if let Some(canvas) = factory.canvas() {
        tracing::debug!(width = canvas.width(), height = canvas.height(), "card finished");
    }

    // Finish recording if active, even when the card failed.
    drop(ctx);
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    let output = result?;
    eprintln!("Saved: {}", output.display());
    Ok(())
}
