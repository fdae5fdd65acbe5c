//! Error types for this crate

use chrono::NaiveDate;
use thiserror::Error;

use crate::references::ReferenceKind;

/// Errors that can happen while generating or synchronizing occurrences
#[derive(Error, Debug)]
pub enum Error {
    /// A venue, organiser, tag or category name could not be resolved, even after a bulk and a targeted lookup
    #[error("{kind} '{name}' not found on the remote service")]
    ReferenceNotFound { kind: ReferenceKind, name: String },

    /// The existing events of the target window could not be fetched. This aborts a whole run.
    #[error("Unable to prefetch existing events: {0}")]
    PrefetchFailed(String),

    /// A template is malformed. This is detected when the configuration is loaded.
    #[error("Invalid template '{key}': {reason}")]
    InvalidRuleInput { key: String, reason: String },

    #[error("{weeks} week(s) after {start} is out of the supported date range")]
    DateOutOfRange { start: NaiveDate, weeks: u32 },

    #[error("Invalid weekday index {0} (expected 0 for Monday to 6 for Sunday)")]
    InvalidWeekday(u8),

    #[error("Unexpected HTTP status code {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A failure reported by a remote source that is not an HTTP one (e.g. a mocked remote)
    #[error("Remote error: {0}")]
    Remote(String),
}

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;
