//! Command handlers
//!
//! One async handler per CLI subcommand. Handlers take the shared
//! [`AppState`] so tests can swap in fake collaborators.

pub mod record;
pub mod schedule;

use crate::config::Config;
use crate::net::{HttpClient, ReqwestClient};
use crate::transcode::{FfmpegTranscoder, Transcoder};
use crate::utils::AppResult;
use std::sync::Arc;

/// Collaborators shared by every command
pub struct AppState {
    pub config: Config,
    pub client: Arc<dyn HttpClient>,
    pub transcoder: Arc<dyn Transcoder>,
}

impl AppState {
    /// Real HTTP client and ffmpeg, as configured
    pub fn from_config(config: Config) -> AppResult<Self> {
        let client = ReqwestClient::new(Some(config.auth.timeout()))?;
        let transcoder = FfmpegTranscoder::new(config.ffmpeg.binary.clone());

        Ok(Self {
            config,
            client: Arc::new(client),
            transcoder: Arc::new(transcoder),
        })
    }
}
