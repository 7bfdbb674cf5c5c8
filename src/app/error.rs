use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoostError {
    #[error("Called too frequently (last attempt at {last_attempt})")]
    RateLimited { last_attempt: DateTime<Utc> },

    #[error("Failed to fetch @{handle}: {reason}")]
    FetchFailed { handle: String, reason: String },

    #[error("Failed to read timeline of @{handle}: {reason}")]
    ExtractionFailed { handle: String, reason: String },

    #[error("Could not follow @{handle}: {reason}")]
    FollowFetchFailed { handle: String, reason: String },

    #[error("Invalid handle: {0:?}")]
    InvalidHandle(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, RoostError>;
