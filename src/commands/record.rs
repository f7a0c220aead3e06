//! `record` command

use super::AppState;
use crate::notify::Notifier;
use crate::recorder::Recorder;
use crate::utils::time::now_jst;
use crate::utils::{AppError, AppResult};
use chrono::{DateTime, FixedOffset};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordRequest {
    pub station_id: String,
    /// Program name, used in the output file name
    pub program: String,
    pub minutes: u64,
    pub upload: bool,
    pub notify: bool,
}

/// `<dir>/<YYYYmmdd_HHMM>_<station>_<program>.aac`
pub fn output_path(
    dir: &Path,
    started: &DateTime<FixedOffset>,
    station_id: &str,
    program: &str,
) -> PathBuf {
    let program = program.replace(['/', '\\'], "_");
    dir.join(format!(
        "{}_{}_{}.aac",
        started.format("%Y%m%d_%H%M"),
        station_id,
        program
    ))
}

/// Record one program and return the output file
pub async fn record(state: &AppState, request: RecordRequest) -> AppResult<PathBuf> {
    if request.minutes == 0 {
        return Err(AppError::InvalidArgument(
            "recording length must be at least one minute".to_string(),
        ));
    }
    let seconds = request.minutes.checked_mul(60).ok_or_else(|| {
        AppError::InvalidArgument(format!("{} minutes is too long to record", request.minutes))
    })?;

    let output = output_path(
        &state.config.recorder.output_dir,
        &now_jst(),
        &request.station_id,
        &request.program,
    );

    let notifier = Notifier::new(state.client.clone(), state.config.notify.clone());
    if request.notify {
        notifier
            .post(&format!("Start: {} {}", request.station_id, request.program))
            .await;
    }

    let recorder = Recorder::new(
        state.client.clone(),
        state.transcoder.clone(),
        state.config.auth.clone(),
        state.config.recorder.clone(),
    );
    let output = recorder
        .record(
            &request.station_id,
            Duration::from_secs(seconds),
            output,
        )
        .await?;

    if request.upload {
        tracing::info!("Upload requested for {:?}; no upload target is configured", output);
    }

    if request.notify {
        notifier
            .post(&format!("Done: {} {}", request.station_id, request.program))
            .await;
    }

    Ok(output)
}
