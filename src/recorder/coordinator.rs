//! Recording coordinator
//!
//! Runs one recording end to end: authorize, poll segments until the
//! duration is reached, then assemble the output file.

use super::assembler::Assembler;
use super::manifest::ResolveError;
use super::poller::{PollIntervals, SegmentPoller};
use super::state::RecordingSession;
use crate::auth::{AuthError, Authorizer};
use crate::config::{AuthConfig, RecorderConfig};
use crate::net::HttpClient;
use crate::transcode::Transcoder;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Authorization failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Could not resolve stream: {0}")]
    Resolve(#[from] ResolveError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RecordResult<T> = Result<T, RecordError>;

/// Records single stations, one at a time
pub struct Recorder {
    client: Arc<dyn HttpClient>,
    transcoder: Arc<dyn Transcoder>,
    auth: AuthConfig,
    config: RecorderConfig,
}

impl Recorder {
    pub fn new(
        client: Arc<dyn HttpClient>,
        transcoder: Arc<dyn Transcoder>,
        auth: AuthConfig,
        config: RecorderConfig,
    ) -> Self {
        Self {
            client,
            transcoder,
            auth,
            config,
        }
    }

    /// Record `station_id` for `duration` into `output_path`.
    ///
    /// Returns the output path. A failed final mux is logged by the
    /// assembler and does not turn into an error here.
    pub async fn record(
        &self,
        station_id: &str,
        duration: Duration,
        output_path: PathBuf,
    ) -> RecordResult<PathBuf> {
        tracing::info!(
            "Recording {} for {}s to {:?}",
            station_id,
            duration.as_secs(),
            output_path
        );

        let headers = Authorizer::new(self.client.clone(), self.auth.clone())
            .authorize()
            .await?
            .with_keep_alive();

        let mut session = RecordingSession::new(
            station_id,
            headers,
            duration,
            output_path,
            &self.config.work_dir,
        )?;

        let poller = SegmentPoller::new(
            self.client.clone(),
            self.transcoder.clone(),
            &self.config.master_playlist_url,
            PollIntervals {
                retry: self.config.retry_interval(),
                poll: self.config.poll_interval(),
            },
        );
        poller.run(&mut session).await?;

        let output = Assembler::new(self.transcoder.clone())
            .assemble(&mut session)
            .await;

        tracing::info!("Recording of {} finished: {:?}", station_id, output);
        Ok(output)
    }
}
