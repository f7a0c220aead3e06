//! HLS manifest lookup and parsing

use super::state::{Segment, SegmentTime};
use crate::auth::SignedHeaders;
use crate::net::{HttpClient, NetError};
use chrono::DateTime;
use hls_m3u8::tags::VariantStream;
use hls_m3u8::{MasterPlaylist, MediaPlaylist};
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Session id placeholder. The stream server wants an lsid-shaped value
/// but does not check it.
pub const DUMMY_LSID: &str = "1111111111111111111111111111111111111111";

/// Number of segments the server lists per media manifest
const LIST_SIZE: &str = "15";

const PROGRAM_DATE_TIME_TAG: &str = "#EXT-X-PROGRAM-DATE-TIME:";

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Net(#[from] NetError),

    #[error("Manifest request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Manifest parsing error: {0}")]
    Parse(String),

    #[error("Master manifest lists no stream variants")]
    NoVariants,
}

/// Finds the media manifest of a station
pub struct ManifestResolver {
    client: Arc<dyn HttpClient>,
    master_url: String,
}

impl ManifestResolver {
    pub fn new(client: Arc<dyn HttpClient>, master_url: &str) -> Self {
        Self {
            client,
            master_url: master_url.to_string(),
        }
    }

    /// Master manifest URL for `station_id`
    pub fn master_playlist_url(&self, station_id: &str) -> Result<Url, ResolveError> {
        Url::parse_with_params(
            &self.master_url,
            &[
                ("station_id", station_id),
                ("l", LIST_SIZE),
                ("lsid", DUMMY_LSID),
                ("type", "b"),
            ],
        )
        .map_err(|e| ResolveError::InvalidUrl(format!("{}: {}", self.master_url, e)))
    }

    /// URL of the first variant's media manifest
    pub async fn resolve_media_manifest(
        &self,
        headers: &SignedHeaders,
        station_id: &str,
    ) -> Result<Url, ResolveError> {
        let url = self.master_playlist_url(station_id)?;
        tracing::debug!("Master playlist url: {}", url);

        let response = self.client.get(&url, &headers.pairs()).await?;
        if !response.is_ok() {
            tracing::warn!(
                "Failed to get media playlist url: HTTP {}: {}",
                response.status,
                response.text().trim()
            );
            return Err(ResolveError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }

        let uri = first_variant_uri(&response.text())?;
        let media_url = url
            .join(&uri)
            .map_err(|e| ResolveError::InvalidUrl(format!("{}: {}", uri, e)))?;

        tracing::info!("Media playlist url for {}: {}", station_id, media_url);
        Ok(media_url)
    }
}

/// URI of the first `#EXT-X-STREAM-INF` entry of a master manifest
pub fn first_variant_uri(body: &str) -> Result<String, ResolveError> {
    let master =
        MasterPlaylist::try_from(body).map_err(|e| ResolveError::Parse(e.to_string()))?;

    master
        .variant_streams
        .iter()
        .find_map(|variant| match variant {
            VariantStream::ExtXStreamInf { uri, .. } => Some(uri.to_string()),
            _ => None,
        })
        .ok_or(ResolveError::NoVariants)
}

/// Segments of a media manifest, resolved against `base`. Segments without
/// a program date-time cannot be deduplicated and are skipped.
pub fn parse_media_segments(body: &str, base: &Url) -> Result<Vec<Segment>, ResolveError> {
    let media = MediaPlaylist::try_from(body).map_err(|e| ResolveError::Parse(e.to_string()))?;

    let mut segments = Vec::new();
    for (_, segment) in media.segments.iter() {
        let Some(program_date_time) = segment.program_date_time.as_ref() else {
            tracing::warn!("Segment {} has no program date-time, skipping", segment.uri());
            continue;
        };

        let timestamp = parse_program_date_time(&program_date_time.to_string())?;
        let uri = base
            .join(segment.uri())
            .map_err(|e| ResolveError::InvalidUrl(format!("{}: {}", segment.uri(), e)))?;
        segments.push(Segment::new(timestamp, uri.to_string()));
    }

    Ok(segments)
}

/// Accepts either the bare date-time or the full tag line
fn parse_program_date_time(value: &str) -> Result<SegmentTime, ResolveError> {
    let value = value.trim();
    let value = value.strip_prefix(PROGRAM_DATE_TIME_TAG).unwrap_or(value);

    DateTime::parse_from_rfc3339(value)
        .map_err(|e| ResolveError::Parse(format!("Invalid program date-time {:?}: {}", value, e)))
}
