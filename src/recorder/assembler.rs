//! Joins the segments of a finished session into one file

use super::state::{PollerState, RecordingSession};
use crate::transcode::Transcoder;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Assembler {
    transcoder: Arc<dyn Transcoder>,
}

impl Assembler {
    pub fn new(transcoder: Arc<dyn Transcoder>) -> Self {
        Self { transcoder }
    }

    /// Concatenate the session's segments into its output path, then delete
    /// the segment files whatever the outcome. Mux failures are only logged.
    pub async fn assemble(&self, session: &mut RecordingSession) -> PathBuf {
        let output = session.output_path().to_path_buf();
        let files = session.segment_files();

        tracing::info!(
            "Assembling {} of {} segments into {:?}",
            files.len(),
            session.recorded().len(),
            output
        );

        if let Some(parent) = output.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create {:?}: {}", parent, e);
            }
        }

        match self.transcoder.concat(&files, &output).await {
            Ok(()) => tracing::info!("Recording saved: {:?}", output),
            Err(e) => tracing::error!("Failed to concatenate segments: {}", e),
        }

        for file in &files {
            if let Err(e) = std::fs::remove_file(file) {
                tracing::warn!("Failed to remove {:?}: {}", file, e);
            }
        }

        session.set_state(PollerState::Done);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::state::tests::{at, signed_headers};
    use crate::recorder::state::Segment;
    use crate::transcode::testing::FakeTranscoder;
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    fn session_with_segments(dir: &TempDir, offsets: &[i64]) -> RecordingSession {
        let mut session = RecordingSession::new(
            "QRR",
            signed_headers(),
            Duration::from_secs(60),
            dir.path().join("out").join("show.aac"),
            dir.path(),
        )
        .unwrap();
        for offset in offsets {
            let path = session.segment_path(&at(*offset));
            std::fs::write(&path, b"aac").unwrap();
            session.record_segment(Segment {
                path: Some(path),
                ..Segment::new(at(*offset), "uri")
            });
        }
        session
    }

    #[tokio::test]
    async fn test_inputs_in_timestamp_order() {
        let dir = tempdir().unwrap();
        let mut session = session_with_segments(&dir, &[15, 0, 10, 5]);
        let transcoder = Arc::new(FakeTranscoder::new());

        let output = Assembler::new(transcoder.clone()).assemble(&mut session).await;

        let (inputs, out) = &transcoder.concat_calls()[0];
        let expected: Vec<PathBuf> = [0, 5, 10, 15]
            .iter()
            .map(|s| session.segment_path(&at(*s)))
            .collect();
        assert_eq!(inputs, &expected);
        assert!(inputs.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(out, &output);
        assert!(output.is_file());
        assert_eq!(session.state(), PollerState::Done);
    }

    #[tokio::test]
    async fn test_missing_segment_skipped() {
        let dir = tempdir().unwrap();
        let mut session = session_with_segments(&dir, &[0, 10]);
        session.record_segment(Segment::new(at(5), "uri"));
        let transcoder = Arc::new(FakeTranscoder::new());

        Assembler::new(transcoder.clone()).assemble(&mut session).await;

        let (inputs, _) = &transcoder.concat_calls()[0];
        assert_eq!(inputs.len(), 2);
        assert!(!inputs.contains(&session.segment_path(&at(5))));
    }

    #[tokio::test]
    async fn test_segments_removed_when_concat_fails() {
        let dir = tempdir().unwrap();
        let mut session = session_with_segments(&dir, &[0, 5]);
        let transcoder = Arc::new(FakeTranscoder::new().failing_concat());

        let output = Assembler::new(transcoder.clone()).assemble(&mut session).await;

        assert!(!output.exists());
        assert!(!session.segment_path(&at(0)).exists());
        assert!(!session.segment_path(&at(5)).exists());
        assert_eq!(session.state(), PollerState::Done);
    }
}
