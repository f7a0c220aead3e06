//! Recording state management
//!
//! Defines the poller state machine and the per-session bookkeeping.

use crate::auth::SignedHeaders;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::Instant;

/// Delivery time of a segment; unique per segment within a stream
pub type SegmentTime = DateTime<FixedOffset>;

/// Current state of a recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollerState {
    /// Looking up the media manifest
    #[default]
    Resolving,
    /// Fetching the manifest and pulling new segments
    Polling,
    /// Duration reached, segments are being assembled
    Draining,
    /// Output written and temporaries removed
    Done,
}

/// One segment listed in a media manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub timestamp: SegmentTime,
    pub uri: String,
    /// Local file, once transcoded
    pub path: Option<PathBuf>,
}

impl Segment {
    pub fn new(timestamp: SegmentTime, uri: impl Into<String>) -> Self {
        Self {
            timestamp,
            uri: uri.into(),
            path: None,
        }
    }
}

/// State of one recording: what has been pulled so far and where it lives.
///
/// The temporary directory is removed when the session is dropped.
#[derive(Debug)]
pub struct RecordingSession {
    station_id: String,
    headers: SignedHeaders,
    duration: Duration,
    output_path: PathBuf,
    recorded: BTreeSet<SegmentTime>,
    files: BTreeMap<SegmentTime, PathBuf>,
    started_at: Option<Instant>,
    state: PollerState,
    temp_dir: TempDir,
}

impl RecordingSession {
    /// Create a session whose segment files go in a fresh directory under `work_dir`
    pub fn new(
        station_id: &str,
        headers: SignedHeaders,
        duration: Duration,
        output_path: PathBuf,
        work_dir: &Path,
    ) -> std::io::Result<Self> {
        std::fs::create_dir_all(work_dir)?;
        let temp_dir = tempfile::Builder::new()
            .prefix(&format!("radiko-{}-", station_id))
            .tempdir_in(work_dir)?;

        tracing::debug!("Segment directory: {:?}", temp_dir.path());

        Ok(Self {
            station_id: station_id.to_string(),
            headers,
            duration,
            output_path,
            recorded: BTreeSet::new(),
            files: BTreeMap::new(),
            started_at: None,
            state: PollerState::Resolving,
            temp_dir,
        })
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn headers(&self) -> &SignedHeaders {
        &self.headers
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: PollerState) {
        tracing::debug!("Session {}: {:?} -> {:?}", self.station_id, self.state, state);
        self.state = state;
    }

    /// Start the duration clock
    pub(crate) fn start_clock(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Time since the clock started (zero before)
    pub fn elapsed(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// True once the requested duration has passed
    pub fn is_complete(&self) -> bool {
        self.started_at.is_some() && self.elapsed() >= self.duration
    }

    /// Recorded timestamps in ascending order
    pub fn recorded(&self) -> &BTreeSet<SegmentTime> {
        &self.recorded
    }

    pub fn is_recorded(&self, timestamp: &SegmentTime) -> bool {
        self.recorded.contains(timestamp)
    }

    /// Mark the segment's timestamp as recorded and keep its file, if it
    /// has one. Returns false when the timestamp was already recorded.
    pub(crate) fn record_segment(&mut self, segment: Segment) -> bool {
        if !self.recorded.insert(segment.timestamp) {
            return false;
        }
        if let Some(path) = segment.path {
            self.files.insert(segment.timestamp, path);
        }
        true
    }

    /// Files of successfully transcoded segments, in timestamp order
    pub fn segment_files(&self) -> Vec<PathBuf> {
        self.files.values().cloned().collect()
    }

    /// File a segment with this timestamp is written to
    pub fn segment_path(&self, timestamp: &SegmentTime) -> PathBuf {
        self.temp_dir
            .path()
            .join(format!("{}.aac", timestamp.format("%Y%m%d%H%M%S%3f")))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::tempdir;

    pub(crate) fn at(secs: i64) -> SegmentTime {
        DateTime::parse_from_rfc3339("2024-01-05T12:00:00+09:00").unwrap()
            + chrono::Duration::seconds(secs)
    }

    pub(crate) fn signed_headers() -> SignedHeaders {
        SignedHeaders::baseline("test", "JP13").signed("token", "key")
    }

    #[test]
    fn test_new_session() {
        let dir = tempdir().unwrap();
        let session = RecordingSession::new(
            "TBS",
            signed_headers(),
            Duration::from_secs(60),
            dir.path().join("out.aac"),
            &dir.path().join("work"),
        )
        .unwrap();

        assert_eq!(session.state(), PollerState::Resolving);
        assert!(session.temp_dir().starts_with(dir.path().join("work")));
        assert!(session.temp_dir().is_dir());
        assert!(!session.is_complete());
        assert_eq!(session.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_record_segment_once() {
        let dir = tempdir().unwrap();
        let mut session = RecordingSession::new(
            "TBS",
            signed_headers(),
            Duration::from_secs(60),
            dir.path().join("out.aac"),
            dir.path(),
        )
        .unwrap();

        let saved = |secs: i64| Segment {
            path: Some(PathBuf::from(format!("{}.aac", secs))),
            ..Segment::new(at(secs), "uri")
        };

        assert!(session.record_segment(saved(5)));
        assert!(session.record_segment(Segment::new(at(0), "uri")));
        assert!(!session.record_segment(saved(5)));
        assert!(session.is_recorded(&at(0)));
        assert_eq!(session.recorded().iter().copied().collect::<Vec<_>>(), vec![at(0), at(5)]);
        // failed transcodes count as recorded but have no file
        assert_eq!(session.segment_files(), vec![PathBuf::from("5.aac")]);
    }

    #[test]
    fn test_segment_path() {
        let dir = tempdir().unwrap();
        let session = RecordingSession::new(
            "TBS",
            signed_headers(),
            Duration::from_secs(60),
            dir.path().join("out.aac"),
            dir.path(),
        )
        .unwrap();

        let path = session.segment_path(&at(5));
        assert_eq!(path.parent().unwrap(), session.temp_dir());
        assert_eq!(path.file_name().unwrap(), "20240105120005000.aac");
    }

    #[test]
    fn test_temp_dir_removed_on_drop() {
        let dir = tempdir().unwrap();
        let session = RecordingSession::new(
            "TBS",
            signed_headers(),
            Duration::from_secs(60),
            dir.path().join("out.aac"),
            dir.path(),
        )
        .unwrap();
        let temp = session.temp_dir().to_path_buf();
        std::fs::write(session.segment_path(&at(0)), b"x").unwrap();

        drop(session);
        assert!(!temp.exists());
    }
}
