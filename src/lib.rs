//! radiko recorder
//!
//! Records live radiko stations to AAC files and searches the daily
//! program schedule. The binary in `main.rs` is a thin clap front end over
//! the [`commands`] handlers.

pub mod auth;
pub mod commands;
pub mod config;
pub mod net;
pub mod notify;
pub mod recorder;
pub mod schedule;
pub mod transcode;
pub mod utils;

use config::LoggingConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber: stderr plus an append-only log file.
///
/// `RUST_LOG` takes precedence over the configured default filter.
pub fn init_logging(config: &LoggingConfig) -> std::io::Result<()> {
    std::fs::create_dir_all(&config.log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_dir.join(&config.file_name))?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    tracing::info!("Starting radiko-recorder v{}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
