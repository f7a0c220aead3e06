//! Daily schedule fetch and search

use super::entry::{parse_schedule, ProgramEntry};
use super::matcher::KeywordMatcher;
use super::ScheduleError;
use crate::net::HttpClient;
use crate::utils::time::today_jst;
use chrono::NaiveDate;
use std::sync::Arc;
use url::Url;

/// Holds the most recently fetched schedule for one area
pub struct ScheduleStore {
    client: Arc<dyn HttpClient>,
    url: Url,
    entries: Vec<ProgramEntry>,
    fetched_on: Option<NaiveDate>,
}

impl ScheduleStore {
    pub fn new(client: Arc<dyn HttpClient>, url: &str) -> Result<Self, ScheduleError> {
        let url = Url::parse(url).map_err(|e| ScheduleError::InvalidUrl(format!("{}: {}", url, e)))?;
        Ok(Self {
            client,
            url,
            entries: Vec::new(),
            fetched_on: None,
        })
    }

    /// Download and parse the schedule, replacing the previous one
    pub async fn fetch(&mut self) -> Result<&[ProgramEntry], ScheduleError> {
        self.fetch_on(today_jst()).await
    }

    async fn fetch_on(&mut self, day: NaiveDate) -> Result<&[ProgramEntry], ScheduleError> {
        tracing::debug!("Fetching schedule from {}", self.url);

        let response = self.client.get(&self.url, &[]).await?;
        if !response.is_ok() {
            return Err(ScheduleError::Status {
                url: self.url.to_string(),
                status: response.status,
            });
        }

        let body = String::from_utf8(response.body)
            .map_err(|e| ScheduleError::Parse(format!("Invalid UTF-8: {}", e)))?;
        self.entries = parse_schedule(&body)?;
        self.fetched_on = Some(day);

        tracing::info!("Loaded {} programs from {}", self.entries.len(), self.url);
        Ok(&self.entries)
    }

    /// Fetch again when nothing is loaded or the JST date has changed
    pub async fn ensure_fresh(&mut self) -> Result<(), ScheduleError> {
        self.ensure_fresh_on(today_jst()).await
    }

    async fn ensure_fresh_on(&mut self, day: NaiveDate) -> Result<(), ScheduleError> {
        if self.fetched_on == Some(day) {
            return Ok(());
        }
        self.fetch_on(day).await.map(|_| ())
    }

    /// Date of the last successful fetch
    pub fn fetched_on(&self) -> Option<NaiveDate> {
        self.fetched_on
    }

    /// Every broadcastable program, in document order
    pub fn list_all(&self) -> &[ProgramEntry] {
        &self.entries
    }

    /// Programs matching `matcher`; empty when the matcher has no keywords
    pub fn search(&self, matcher: &KeywordMatcher) -> Vec<&ProgramEntry> {
        if !matcher.is_enabled() {
            return Vec::new();
        }
        self.entries.iter().filter(|e| matcher.matches(e)).collect()
    }
}
