//! Error types and handling
//!
//! Common error type used by the command layer.

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::net::NetError;
use crate::recorder::{RecordError, ResolveError};
use crate::schedule::ScheduleError;
use crate::transcode::TranscodeError;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Net(#[from] NetError),

    #[error("Authorization error: {0}")]
    Auth(#[from] AuthError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Stream error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Transcode error: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("Recording error: {0}")]
    Recording(#[from] RecordError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl AppError {
    /// Short machine-readable code for log lines
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Net(_) => "NETWORK_ERROR",
            AppError::Auth(_) => "AUTH_ERROR",
            AppError::Schedule(_) => "SCHEDULE_ERROR",
            AppError::Resolve(_) => "STREAM_ERROR",
            AppError::Transcode(_) => "TRANSCODE_ERROR",
            AppError::Recording(_) => "RECORDING_ERROR",
            AppError::InvalidArgument(_) => "INVALID_ARGUMENT",
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
