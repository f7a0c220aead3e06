//! External transcoder
//!
//! Decoding a segment stream and joining segment files is left to ffmpeg.
//! The recorder only talks to the [`Transcoder`] trait.

pub mod ffmpeg;

#[cfg(test)]
pub(crate) mod testing;

pub use ffmpeg::FfmpegTranscoder;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Transcoder failures. Logged by callers, never fatal to a session.
#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("FFmpeg exited with {status}: {stderr}")]
    Ffmpeg { status: String, stderr: String },

    #[error("Nothing to concatenate")]
    NoInputs,
}

#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Pull one segment from `uri`, sending `header_block` as extra request
    /// headers, and write the decoded audio to `dest`.
    async fn transcode_segment(
        &self,
        uri: &str,
        header_block: &str,
        dest: &Path,
    ) -> Result<(), TranscodeError>;

    /// Join `inputs`, in the given order, into `output`
    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), TranscodeError>;
}
