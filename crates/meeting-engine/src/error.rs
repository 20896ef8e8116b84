//! Error types for meeting-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::conflict::Conflict;

/// A schedule or meeting record that cannot be turned into a valid value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A mandatory field is absent from the record.
    #[error("missing mandatory field '{field}'")]
    MissingField { field: &'static str },

    /// An optional or mandatory field is present but does not parse.
    #[error("could not parse '{field}' ({value})")]
    Unparseable { field: &'static str, value: String },

    #[error("'{0}' is not a valid day of the week")]
    UnknownWeekday(String),

    #[error("unsupported frequency '{0}' (expected weekly or biweekly)")]
    UnsupportedFrequency(String),

    #[error("unsupported recurrence interval {0} (expected 1 or 2 weeks)")]
    UnsupportedInterval(u32),
}

impl ValidationError {
    /// Name of the record field this error concerns.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field } => field,
            ValidationError::Unparseable { field, .. } => field,
            ValidationError::UnknownWeekday(_) => "day",
            ValidationError::UnsupportedFrequency(_) | ValidationError::UnsupportedInterval(_) => {
                "frequency"
            }
        }
    }
}

/// Two meetings occupy the same channel at overlapping times.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{conflict}")]
pub struct ConflictError {
    pub conflict: Conflict,
}

impl From<Conflict> for ConflictError {
    fn from(conflict: Conflict) -> Self {
        ConflictError { conflict }
    }
}

/// Any failure surfaced by the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A validation failure inside a named meeting source (file name or "stdin").
    #[error("invalid meeting definition in {source_name}: {source}")]
    InMeeting {
        source_name: String,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error("projection window of {days} days from {start} ends past the supported date range")]
    WindowOutOfRange { start: DateTime<Utc>, days: u32 },
}

/// Convenience alias used throughout meeting-engine.
pub type Result<T> = std::result::Result<T, EngineError>;
