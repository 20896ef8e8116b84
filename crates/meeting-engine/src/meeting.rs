//! A named activity owning its recurring schedules.

use std::path::Path;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::{EngineError, Result, ValidationError};
use crate::record::MeetingRecord;
use crate::schedule::Schedule;

/// Source name used for definitions that did not come from a file.
pub const STDIN_SOURCE: &str = "stdin";

/// A meeting and the schedules it occupies.
#[derive(Debug, Clone, PartialEq)]
pub struct Meeting {
    name: String,
    chair: String,
    description: String,
    extras: Map<String, Value>,
    source_name: String,
    schedules: Vec<Schedule>,
}

impl Meeting {
    /// Build a meeting from already-validated schedules.
    ///
    /// Every schedule is re-owned by this meeting, whatever owner it was built with.
    pub fn new(
        name: impl Into<String>,
        chair: impl Into<String>,
        description: impl Into<String>,
        schedules: Vec<Schedule>,
    ) -> Self {
        let name = name.into();
        let schedules = schedules
            .into_iter()
            .map(|s| s.owned_by(&name))
            .collect();
        Meeting {
            name,
            chair: chair.into(),
            description: description.into(),
            extras: Map::new(),
            source_name: STDIN_SOURCE.to_string(),
            schedules,
        }
    }

    /// Validate a raw record read from `source_name` (a file name, or `"stdin"`).
    ///
    /// `today` is the anchor date for schedules without a `start_date`.
    ///
    /// # Errors
    /// Returns `EngineError::InMeeting` wrapping the first validation failure:
    /// a missing `chair`, `description`, `project` or `schedule`, an empty schedule
    /// list, or any invalid schedule entry.
    pub fn from_record(record: MeetingRecord, source_name: &str, today: NaiveDate) -> Result<Self> {
        let in_source = |source: ValidationError| EngineError::InMeeting {
            source_name: source_name.to_string(),
            source,
        };

        let chair = record
            .chair
            .ok_or(ValidationError::MissingField { field: "chair" })
            .map_err(in_source)?;
        let description = record
            .description
            .ok_or(ValidationError::MissingField {
                field: "description",
            })
            .map_err(in_source)?;
        let name = record
            .project
            .ok_or(ValidationError::MissingField { field: "project" })
            .map_err(in_source)?;
        let entries = record
            .schedule
            .filter(|entries| !entries.is_empty())
            .ok_or(ValidationError::MissingField { field: "schedule" })
            .map_err(in_source)?;

        let schedules = entries
            .iter()
            .map(|entry| Schedule::from_record(&name, entry, today))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(in_source)?;

        Ok(Meeting {
            name,
            chair,
            description,
            extras: record.extras,
            source_name: source_name.to_string(),
            schedules,
        })
    }

    /// Attach a free-form field, replacing any previous value under `key`.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    pub fn with_source_name(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = source_name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chair(&self) -> &str {
        &self.chair
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Every field of the definition not otherwise modelled, in definition order.
    pub fn extras(&self) -> &Map<String, Value> {
        &self.extras
    }

    /// A single extra field rendered as text, if present and scalar.
    pub fn extra_str(&self, key: &str) -> Option<String> {
        match self.extras.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Calendar file name for this meeting alone: the source stem with `.ics`.
    pub fn output_file_name(&self) -> String {
        let stem = Path::new(&self.source_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(STDIN_SOURCE);
        format!("{}.ics", stem)
    }
}
