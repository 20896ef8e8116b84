//! Raw input records as produced by a definition parser.
//!
//! Every field is optional at the type level so that a missing field surfaces as a
//! [`ValidationError`](crate::error::ValidationError) naming it, rather than as an
//! opaque deserialization failure.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A scalar that a definition format may write either as text or as a bare number
/// (`time: 0900` and `time: '0900'` are both common).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Text(String),
}

impl Scalar {
    /// Render as a fixed-width numeric field, zero-padding integers to `width`.
    ///
    /// Used for `HHMM` times where a parser may have dropped the leading zero.
    pub fn padded(&self, width: usize) -> String {
        match self {
            Scalar::Integer(n) => format!("{:0width$}", n, width = width),
            Scalar::Text(s) => {
                let s = s.trim();
                if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                    format!("{:0>width$}", s, width = width)
                } else {
                    s.to_string()
                }
            }
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Integer(n)
    }
}

/// One unvalidated schedule entry of a meeting definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    /// Start time as `HHMM`, in UTC.
    pub time: Option<Scalar>,
    /// Weekday name, any case.
    pub day: Option<String>,
    /// Channel the meeting is held in, without a leading `#`.
    #[serde(alias = "channel")]
    pub irc: Option<String>,
    /// `weekly` or `biweekly`.
    pub frequency: Option<String>,
    /// First date the schedule applies from, as `YYYYMMDD`.
    pub start_date: Option<Scalar>,
    /// Length in minutes.
    pub duration: Option<Scalar>,
}

/// One unvalidated meeting definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub project: Option<String>,
    pub chair: Option<String>,
    pub description: Option<String>,
    pub schedule: Option<Vec<ScheduleRecord>>,
    /// Every other top-level key, in definition order.
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}
