//! Recording [`Transcoder`] for unit tests

use super::{TranscodeError, Transcoder};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// Writes a placeholder file per segment and remembers every call
#[derive(Default)]
pub struct FakeTranscoder {
    failing_uris: Vec<String>,
    fail_concat: bool,
    segment_calls: Mutex<Vec<(String, String, PathBuf)>>,
    concat_calls: Mutex<Vec<(Vec<PathBuf>, PathBuf)>>,
}

impl FakeTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Segment transcodes of `uri` fail without writing a file
    pub fn failing_on(mut self, uri: &str) -> Self {
        self.failing_uris.push(uri.to_string());
        self
    }

    pub fn failing_concat(mut self) -> Self {
        self.fail_concat = true;
        self
    }

    pub fn segment_calls(&self) -> Vec<(String, String, PathBuf)> {
        self.segment_calls.lock().clone()
    }

    pub fn concat_calls(&self) -> Vec<(Vec<PathBuf>, PathBuf)> {
        self.concat_calls.lock().clone()
    }

    fn failure(message: &str) -> TranscodeError {
        TranscodeError::Ffmpeg {
            status: "exit status: 1".to_string(),
            stderr: message.to_string(),
        }
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn transcode_segment(
        &self,
        uri: &str,
        header_block: &str,
        dest: &Path,
    ) -> Result<(), TranscodeError> {
        self.segment_calls
            .lock()
            .push((uri.to_string(), header_block.to_string(), dest.to_path_buf()));

        if self.failing_uris.iter().any(|u| u == uri) {
            return Err(Self::failure("segment unavailable"));
        }
        std::fs::write(dest, uri.as_bytes()).map_err(|e| Self::failure(&e.to_string()))
    }

    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), TranscodeError> {
        self.concat_calls
            .lock()
            .push((inputs.to_vec(), output.to_path_buf()));

        if self.fail_concat {
            return Err(Self::failure("concat failed"));
        }
        std::fs::write(output, b"joined").map_err(|e| Self::failure(&e.to_string()))
    }
}
