//! FFmpeg-backed transcoder
//!
//! Argument lists are built by plain functions so they can be checked
//! without running ffmpeg.

use super::{TranscodeError, Transcoder};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Input format of radiko segments
const SEGMENT_FORMAT: &str = "aac";

/// Rewrites ADTS framing into the form the output container expects
const CONCAT_BITSTREAM_FILTER: &str = "aac_adtstoasc";

/// Runs the `ffmpeg` executable
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: &[String]) -> Result<(), TranscodeError> {
        tracing::debug!("Running {:?} {:?}", self.binary, args);

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| TranscodeError::Spawn {
                program: self.binary.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(TranscodeError::Ffmpeg {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode_segment(
        &self,
        uri: &str,
        header_block: &str,
        dest: &Path,
    ) -> Result<(), TranscodeError> {
        self.run(&build_segment_args(uri, header_block, dest)).await
    }

    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), TranscodeError> {
        if inputs.is_empty() {
            return Err(TranscodeError::NoInputs);
        }
        self.run(&build_concat_args(inputs, output)).await
    }
}

/// `ffmpeg` arguments that download and decode one segment
pub fn build_segment_args(uri: &str, header_block: &str, dest: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-headers".to_string(),
        header_block.to_string(),
        "-f".to_string(),
        SEGMENT_FORMAT.to_string(),
        "-i".to_string(),
        uri.to_string(),
        dest.to_string_lossy().to_string(),
    ]
}

/// `ffmpeg` arguments that join audio files in order with the concat filter
pub fn build_concat_args(inputs: &[PathBuf], output: &Path) -> Vec<String> {
    let mut args = vec![
        "-y".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
    ];

    for input in inputs {
        args.extend(["-i".to_string(), input.to_string_lossy().to_string()]);
    }

    args.extend([
        "-filter_complex".to_string(),
        build_concat_filter(inputs.len()),
        "-map".to_string(),
        "[aout]".to_string(),
        "-bsf:a".to_string(),
        CONCAT_BITSTREAM_FILTER.to_string(),
        output.to_string_lossy().to_string(),
    ]);

    args
}

/// Audio-only concat filter over `count` inputs, labelled `[aout]`
fn build_concat_filter(count: usize) -> String {
    let labels: String = (0..count).map(|i| format!("[{}:a]", i)).collect();
    format!("{}concat=n={}:v=0:a=1[aout]", labels, count)
}
