//! Segment polling loop
//!
//! Re-reads the rotating media manifest until the session duration has
//! passed, pulling each newly listed segment exactly once. The duration is
//! only checked between iterations, so a session can run slightly long.

use super::manifest::{parse_media_segments, ManifestResolver, ResolveError};
use super::state::{PollerState, RecordingSession, Segment};
use crate::auth::SignedHeaders;
use crate::net::HttpClient;
use crate::transcode::Transcoder;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Query parameter that keeps caches from serving a stale manifest
const CACHE_BUST_PARAM: &str = "_";

/// Sleep lengths of the polling loop
#[derive(Debug, Clone, Copy)]
pub struct PollIntervals {
    /// After a failed manifest fetch
    pub retry: Duration,
    /// After every successful poll
    pub poll: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            retry: Duration::from_secs(3),
            poll: Duration::from_secs(5),
        }
    }
}

/// Strictly increasing cache-busting values, in centiseconds since the epoch
#[derive(Debug, Default)]
struct CacheBuster {
    last: i64,
}

impl CacheBuster {
    fn next_value(&mut self, now_centis: i64) -> i64 {
        self.last = now_centis.max(self.last + 1);
        self.last
    }

    fn bust(&mut self, url: &Url) -> Url {
        let value = self.next_value(Utc::now().timestamp_millis() / 10);
        let mut busted = url.clone();
        busted
            .query_pairs_mut()
            .append_pair(CACHE_BUST_PARAM, &value.to_string());
        busted
    }
}

/// Drives a [`RecordingSession`] from `Resolving` to `Draining`
pub struct SegmentPoller {
    client: Arc<dyn HttpClient>,
    transcoder: Arc<dyn Transcoder>,
    resolver: ManifestResolver,
    intervals: PollIntervals,
}

impl SegmentPoller {
    pub fn new(
        client: Arc<dyn HttpClient>,
        transcoder: Arc<dyn Transcoder>,
        master_playlist_url: &str,
        intervals: PollIntervals,
    ) -> Self {
        Self {
            resolver: ManifestResolver::new(client.clone(), master_playlist_url),
            client,
            transcoder,
            intervals,
        }
    }

    /// Record until the session's duration has elapsed.
    ///
    /// Only the initial manifest resolution can fail; everything after it
    /// is retried or logged.
    pub async fn run(&self, session: &mut RecordingSession) -> Result<(), ResolveError> {
        tracing::debug!("Record start: {}", session.station_id());
        session.set_state(PollerState::Resolving);

        let media_url = self
            .resolver
            .resolve_media_manifest(session.headers(), session.station_id())
            .await?;

        session.start_clock();
        session.set_state(PollerState::Polling);

        let header_block = session.headers().to_header_block();
        let mut buster = CacheBuster::default();

        while !session.is_complete() {
            let url = buster.bust(&media_url);
            let segments = match self.fetch_segments(&url, session.headers()).await {
                Ok(segments) => segments,
                Err(e) => {
                    // the manifest is often briefly unavailable
                    tracing::debug!("Media playlist not ready ({}), retrying", e);
                    tokio::time::sleep(self.intervals.retry).await;
                    continue;
                }
            };

            for segment in segments {
                if session.is_recorded(&segment.timestamp) {
                    continue;
                }
                let segment = self.pull_segment(session, segment, &header_block).await;
                session.record_segment(segment);
            }

            tokio::time::sleep(self.intervals.poll).await;
        }

        session.set_state(PollerState::Draining);
        tracing::info!(
            "Record end: {} segments in {:.1}s",
            session.recorded().len(),
            session.elapsed().as_secs_f64()
        );
        Ok(())
    }

    async fn fetch_segments(
        &self,
        url: &Url,
        headers: &SignedHeaders,
    ) -> Result<Vec<Segment>, ResolveError> {
        tracing::debug!("Media playlist url: {}", url);

        let response = self.client.get(url, &headers.pairs()).await?;
        if !response.is_ok() {
            return Err(ResolveError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }

        parse_media_segments(&response.text(), url)
    }

    /// Transcode one segment into the session directory. Failures leave a
    /// gap in the recording and are only logged.
    async fn pull_segment(
        &self,
        session: &RecordingSession,
        mut segment: Segment,
        header_block: &str,
    ) -> Segment {
        let dest = session.segment_path(&segment.timestamp);

        match self
            .transcoder
            .transcode_segment(&segment.uri, header_block, &dest)
            .await
        {
            Ok(()) => {
                tracing::debug!("Saved segment {} to {:?}", segment.timestamp, dest);
                segment.path = Some(dest);
            }
            Err(e) => {
                tracing::warn!("Failed to transcode segment {}: {}", segment.uri, e);
            }
        }

        segment
    }
}
