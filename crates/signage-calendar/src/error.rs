//! Error types for signage-calendar operations.
//!
//! Expansion never surfaces these: a malformed schedule expands to nothing.
//! They are returned by the strict parsers and loaders that callers use at
//! their own boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid date: {0:?} (expected DD/MM/YYYY HH:MM:SS)")]
    InvalidDate(String),

    #[error("Invalid time: {0:?} (expected HH:MM:SS)")]
    InvalidTime(String),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Invalid schedules payload: {0}")]
    InvalidPayload(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
