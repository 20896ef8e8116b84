//! Weekly repetition rules.
//!
//! Only fixed weekly intervals are supported: every week or every other week.
//! The rule is a closed set of variants, each mapping to an interval in weeks.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How often a schedule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceRule {
    /// Every week (interval 1).
    Weekly,
    /// Every other week (interval 2).
    Biweekly,
}

impl RecurrenceRule {
    /// Build a rule from an interval count in weeks.
    ///
    /// # Errors
    /// Returns `ValidationError::UnsupportedInterval` for anything but 1 or 2.
    pub fn from_interval(weeks: u32) -> Result<Self, ValidationError> {
        match weeks {
            1 => Ok(RecurrenceRule::Weekly),
            2 => Ok(RecurrenceRule::Biweekly),
            other => Err(ValidationError::UnsupportedInterval(other)),
        }
    }

    /// Parse the frequency name used in meeting definitions.
    ///
    /// # Errors
    /// Returns `ValidationError::UnsupportedFrequency` for unknown names.
    pub fn from_frequency(name: &str) -> Result<Self, ValidationError> {
        match name {
            "weekly" => Ok(RecurrenceRule::Weekly),
            "biweekly" => Ok(RecurrenceRule::Biweekly),
            other => Err(ValidationError::UnsupportedFrequency(other.to_string())),
        }
    }

    /// Repetition interval in weeks.
    pub fn interval(self) -> u32 {
        match self {
            RecurrenceRule::Weekly => 1,
            RecurrenceRule::Biweekly => 2,
        }
    }

    /// Distance between two consecutive occurrences.
    pub fn step(self) -> Duration {
        Duration::weeks(i64::from(self.interval()))
    }

    /// Frequency name as written in meeting definitions.
    pub fn frequency_name(self) -> &'static str {
        match self {
            RecurrenceRule::Weekly => "weekly",
            RecurrenceRule::Biweekly => "biweekly",
        }
    }

    /// RFC 5545 RRULE value, e.g. `FREQ=WEEKLY;INTERVAL=2`.
    pub fn rrule(self) -> String {
        format!("FREQ=WEEKLY;INTERVAL={}", self.interval())
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceRule::Weekly => f.write_str("Weekly"),
            RecurrenceRule::Biweekly => f.write_str("Every two weeks"),
        }
    }
}
