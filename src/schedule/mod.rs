//! Program schedule
//!
//! Fetches the area's daily schedule XML and searches it by keyword.

pub mod entry;
pub mod matcher;
pub mod store;

pub use entry::{parse_schedule, ProgramEntry};
pub use matcher::{KeywordMatcher, MatchField};
pub use store::ScheduleStore;

use crate::net::NetError;
use thiserror::Error;

/// Schedule fetch/parse errors. Fatal for the fetch that raised them.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid schedule URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Net(#[from] NetError),

    #[error("Schedule request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Schedule parsing error: {0}")]
    Parse(String),

    #[error("Invalid {field} value in schedule: {value:?}")]
    InvalidField { field: String, value: String },
}
