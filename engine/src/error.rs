//! Error types for the swim-time engine.

use crate::{RecordId, SwimmerId};
use thiserror::Error;

/// All possible errors from the swim-time engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    // Validation errors
    #[error("invalid distance: {0}m (expected one of 50, 100, 200, 400, 800, 1500)")]
    InvalidDistance(u32),

    #[error("invalid style: {0}")]
    InvalidStyle(String),

    #[error("invalid time: {0}s (must be a finite, non-negative number of seconds)")]
    InvalidTime(f64),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("unrecognised {kind}: '{value}'")]
    Unrecognised { kind: &'static str, value: String },

    #[error("cached pace {cached}s/100m does not match derived pace {derived}s/100m")]
    PaceMismatch { cached: f64, derived: f64 },

    // Store errors
    #[error("record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("unknown swimmer: {0}")]
    UnknownSwimmer(SwimmerId),

    // Exchange errors
    #[error("invalid import document: {0}")]
    InvalidDocument(String),

    #[error("csv export failed: {0}")]
    Csv(String),

    // State errors
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}
