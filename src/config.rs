//! Runtime configuration
//!
//! Every section falls back to its defaults, so an empty JSON object (or no
//! config file at all) yields a working setup for the Tokyo area.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides the notification webhook URL
pub const WEBHOOK_ENV: &str = "RADIKO_WEBHOOK_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub auth: AuthConfig,
    pub schedule: ScheduleConfig,
    pub recorder: RecorderConfig,
    pub ffmpeg: FfmpegConfig,
    pub logging: LoggingConfig,
    pub notify: NotifyConfig,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
        let mut config: Config = serde_json::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let mut config = Config::default();
                config.apply_env();
                Ok(config)
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(WEBHOOK_ENV) {
            if !url.trim().is_empty() {
                self.notify.webhook_url = Some(url);
            }
        }
    }
}

/// Handshake endpoints and client identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub auth1_url: String,
    pub auth2_url: String,
    /// Area code sent as `X-Radiko-AreaId`
    pub area_id: String,
    pub user_agent: String,
    /// Per-request timeout for both handshakes (seconds)
    pub timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth1_url: "https://radiko.jp/v2/api/auth1".to_string(),
            auth2_url: "https://radiko.jp/v2/api/auth2".to_string(),
            area_id: "JP13".to_string(),
            user_agent: format!("radiko-recorder/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 5,
        }
    }
}

impl AuthConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Daily schedule URL; `{area}` is replaced by the area id
    pub url_template: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            url_template: "http://radiko.jp/v3/program/today/{area}.xml".to_string(),
        }
    }
}

impl ScheduleConfig {
    pub fn url_for(&self, area_id: &str) -> String {
        self.url_template.replace("{area}", area_id)
    }
}

/// Polling loop timing and file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    pub master_playlist_url: String,
    /// Wait after a failed media manifest fetch (seconds)
    pub retry_interval_secs: u64,
    /// Wait between successful polls (seconds)
    pub poll_interval_secs: u64,
    /// Parent of the per-session temporary directory
    pub work_dir: PathBuf,
    /// Where finished recordings are written
    pub output_dir: PathBuf,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            master_playlist_url: "https://rpaa.smartstream.ne.jp/so/playlist.m3u8".to_string(),
            retry_interval_secs: 3,
            poll_interval_secs: 5,
            work_dir: PathBuf::from("tmp"),
            output_dir: PathBuf::from("recordings"),
        }
    }
}

impl RecorderConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FfmpegConfig {
    /// ffmpeg executable (name on PATH or absolute path)
    pub binary: PathBuf,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub file_name: String,
    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(".log"),
            file_name: "radiko_recorder.log".to_string(),
            default_filter: "radiko_recorder=debug".to_string(),
        }
    }
}

/// Chat webhook notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Incoming webhook URL; notifications are off when unset
    pub webhook_url: Option<String>,
    pub username: String,
    pub icon_emoji: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            username: "radiko-recorder".to_string(),
            icon_emoji: ":radio:".to_string(),
        }
    }
}
