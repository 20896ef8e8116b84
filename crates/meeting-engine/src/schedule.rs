//! A single recurring slot of a meeting.
//!
//! A [`Schedule`] pins a meeting to a weekday, a UTC time of day, a duration and a
//! channel. It computes its first concrete occurrence on or after its anchor date,
//! and can compare itself against another schedule within one canonical week,
//! ignoring calendar dates entirely.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc, Weekday};

use crate::error::ValidationError;
use crate::record::ScheduleRecord;
use crate::recurrence::RecurrenceRule;

/// Duration used when a record does not specify one.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

const MINUTES_PER_DAY: i64 = 24 * 60;
const MINUTES_PER_WEEK: i64 = 7 * MINUTES_PER_DAY;

/// One recurring slot of a meeting. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    owner: String,
    channel: String,
    day: Weekday,
    time: NaiveTime,
    duration_minutes: u32,
    recurrence: RecurrenceRule,
    anchor_date: NaiveDate,
    // Offsets from Monday 00:00 of a canonical week.
    week_start: Duration,
    week_end: Duration,
}

impl Schedule {
    /// Build a schedule from already-typed values.
    ///
    /// # Errors
    /// Returns `ValidationError::Unparseable` for a zero duration.
    pub fn new(
        owner: impl Into<String>,
        channel: impl Into<String>,
        day: Weekday,
        time: NaiveTime,
        duration_minutes: u32,
        recurrence: RecurrenceRule,
        anchor_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if duration_minutes == 0 {
            return Err(ValidationError::Unparseable {
                field: "duration",
                value: duration_minutes.to_string(),
            });
        }

        let (week_start, week_end) = week_interval(day, time, duration_minutes);

        Ok(Schedule {
            owner: owner.into(),
            channel: channel.into(),
            day,
            time,
            duration_minutes,
            recurrence,
            anchor_date,
            week_start,
            week_end,
        })
    }

    /// Validate a raw record into a schedule owned by the meeting named `owner`.
    ///
    /// `today` stands in for a missing `start_date`.
    ///
    /// # Errors
    /// Returns a `ValidationError` naming the first field that is missing
    /// (`time`, `day`, `irc`, `frequency`, checked in that order) or malformed.
    pub fn from_record(
        owner: &str,
        record: &ScheduleRecord,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let time = record
            .time
            .as_ref()
            .ok_or(ValidationError::MissingField { field: "time" })?;
        let day = record
            .day
            .as_deref()
            .ok_or(ValidationError::MissingField { field: "day" })?;
        let channel = record
            .irc
            .as_deref()
            .ok_or(ValidationError::MissingField { field: "irc" })?;
        let frequency = record
            .frequency
            .as_deref()
            .ok_or(ValidationError::MissingField { field: "frequency" })?;

        let time_text = time.padded(4);
        let time = NaiveTime::parse_from_str(&time_text, "%H%M").map_err(|_| {
            ValidationError::Unparseable {
                field: "time",
                value: time.to_string(),
            }
        })?;
        let day = parse_weekday(day)?;
        let recurrence = RecurrenceRule::from_frequency(frequency)?;

        let anchor_date = match &record.start_date {
            Some(raw) => NaiveDate::parse_from_str(&raw.padded(8), "%Y%m%d").map_err(|_| {
                ValidationError::Unparseable {
                    field: "start_date",
                    value: raw.to_string(),
                }
            })?,
            None => today,
        };

        let duration_minutes = match &record.duration {
            Some(raw) => parse_duration(&raw.to_string())?,
            None => DEFAULT_DURATION_MINUTES,
        };

        Schedule::new(
            owner,
            channel,
            day,
            time,
            duration_minutes,
            recurrence,
            anchor_date,
        )
    }

    pub(crate) fn owned_by(mut self, owner: &str) -> Self {
        self.owner = owner.to_string();
        self
    }

    /// Name of the meeting owning this schedule.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    /// Start time of day, in UTC.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes))
    }

    pub fn recurrence(&self) -> RecurrenceRule {
        self.recurrence
    }

    /// Date from which occurrences are searched.
    pub fn anchor_date(&self) -> NaiveDate {
        self.anchor_date
    }

    /// The slot as `(start, end)` offsets from Monday 00:00 of a canonical week.
    ///
    /// A Sunday slot that runs past midnight is shifted back by one week, so its
    /// tail lands on the Monday at the start of the week.
    pub fn week_interval(&self) -> (Duration, Duration) {
        (self.week_start, self.week_end)
    }

    /// First start instant, on or after the anchor date, falling on the schedule's
    /// weekday at its time of day (UTC).
    ///
    /// The anchor date itself qualifies when it already is the right weekday.
    pub fn next_occurrence(&self) -> DateTime<Utc> {
        let target = i64::from(self.day.num_days_from_monday());
        let anchor = i64::from(self.anchor_date.weekday().num_days_from_monday());
        let days_ahead = (target - anchor).rem_euclid(7);

        (self.anchor_date + Duration::days(days_ahead))
            .and_time(self.time)
            .and_utc()
    }

    /// Whether both schedules share a channel and overlap within a single week.
    ///
    /// Uses half-open intervals: a slot ending exactly when the other starts does
    /// not conflict.
    pub fn same_week_conflict(&self, other: &Schedule) -> bool {
        self.channel == other.channel
            && self.week_start < other.week_end
            && other.week_start < self.week_end
    }
}

fn week_interval(day: Weekday, time: NaiveTime, duration_minutes: u32) -> (Duration, Duration) {
    let start_minutes = i64::from(day.num_days_from_monday()) * MINUTES_PER_DAY
        + i64::from(time.hour()) * 60
        + i64::from(time.minute());
    let end_minutes = start_minutes + i64::from(duration_minutes);

    if day == Weekday::Sun && end_minutes > MINUTES_PER_WEEK {
        (
            Duration::minutes(start_minutes - MINUTES_PER_WEEK),
            Duration::minutes(end_minutes - MINUTES_PER_WEEK),
        )
    } else {
        (
            Duration::minutes(start_minutes),
            Duration::minutes(end_minutes),
        )
    }
}

/// Match a weekday name case-insensitively against Monday..Sunday.
fn parse_weekday(name: &str) -> Result<Weekday, ValidationError> {
    match name.trim().to_lowercase().as_str() {
        "monday" => Ok(Weekday::Mon),
        "tuesday" => Ok(Weekday::Tue),
        "wednesday" => Ok(Weekday::Wed),
        "thursday" => Ok(Weekday::Thu),
        "friday" => Ok(Weekday::Fri),
        "saturday" => Ok(Weekday::Sat),
        "sunday" => Ok(Weekday::Sun),
        _ => Err(ValidationError::UnknownWeekday(name.to_string())),
    }
}

fn parse_duration(raw: &str) -> Result<u32, ValidationError> {
    match raw.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(ValidationError::Unparseable {
            field: "duration",
            value: raw.to_string(),
        }),
    }
}
