//! Occurrence expansion -- turns a recurring [`Schedule`] into concrete instances.
//!
//! Expansion starts at [`Schedule::next_occurrence`] and steps by the recurrence
//! interval, keeping every start instant inside a closed window
//! `[window_start, window_end]`. The phase of a biweekly schedule is always
//! anchored on its first occurrence, never on the window.

use std::iter::FusedIterator;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::schedule::Schedule;

/// Default projection length used for conflict checking.
pub const DEFAULT_WINDOW_DAYS: u32 = 365;

/// The bounded forward range over which schedules are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ProjectionWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        ProjectionWindow { start, end }
    }

    /// A window starting at `now` and spanning `days` days.
    ///
    /// Fails when the end of the window is past the last representable instant.
    pub fn from_now(now: DateTime<Utc>, days: u32) -> Result<Self> {
        let end = Duration::try_days(i64::from(days))
            .and_then(|span| now.checked_add_signed(span))
            .ok_or(EngineError::WindowOutOfRange { start: now, days })?;
        Ok(ProjectionWindow { start: now, end })
    }
}

/// One concrete, dated occurrence of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingInstance {
    /// Name of the meeting the occurrence belongs to.
    pub owner_name: String,
    pub channel: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MeetingInstance {
    /// Two instances overlap iff `a.start < b.end && b.start < a.end`.
    ///
    /// Back-to-back instances (one ends exactly when the other starts) do not.
    pub fn overlaps(&self, other: &MeetingInstance) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Length of the shared time range, zero when the instances do not overlap.
    pub fn overlap_minutes(&self, other: &MeetingInstance) -> i64 {
        if !self.overlaps(other) {
            return 0;
        }
        (self.end.min(other.end) - self.start.max(other.start)).num_minutes()
    }
}

/// Lazy iterator over the occurrences of one schedule within a window.
///
/// Created by [`expand`]. Each call to `expand` starts from scratch.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    schedule: &'a Schedule,
    /// `None` once the next step would leave the representable range.
    next: Option<DateTime<Utc>>,
    window_end: DateTime<Utc>,
    step: Duration,
    duration: Duration,
}

impl Iterator for Occurrences<'_> {
    type Item = MeetingInstance;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next.filter(|start| *start <= self.window_end)?;
        let Some(end) = start.checked_add_signed(self.duration) else {
            self.next = None;
            return None;
        };
        self.next = start.checked_add_signed(self.step);

        Some(MeetingInstance {
            owner_name: self.schedule.owner().to_string(),
            channel: self.schedule.channel().to_string(),
            start,
            end,
        })
    }
}

impl FusedIterator for Occurrences<'_> {}

/// Expand `schedule` into every occurrence whose start lies in
/// `[window_start, window_end]`, both bounds inclusive.
///
/// Occurrences before `window_start` are skipped arithmetically, so a schedule
/// anchored years in the past costs no more than one anchored today.
pub fn expand(
    schedule: &Schedule,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Occurrences<'_> {
    let step = schedule.recurrence().step();
    let first = schedule.next_occurrence();
    let next = if first < window_start {
        skip_to(first, window_start, step)
    } else {
        Some(first)
    };

    Occurrences {
        schedule,
        next,
        window_end,
        step,
        duration: schedule.duration(),
    }
}

/// First instant `first + k * step` (k >= 0) at or after `window_start`.
fn skip_to(
    first: DateTime<Utc>,
    window_start: DateTime<Utc>,
    step: Duration,
) -> Option<DateTime<Utc>> {
    let step_secs = step.num_seconds();
    let behind_secs = (window_start - first).num_seconds();
    let skipped = (behind_secs + step_secs - 1) / step_secs;
    let mut next = first.checked_add_signed(Duration::try_seconds(skipped * step_secs)?)?;
    // Sub-second remainders of the window start are not covered above.
    while next < window_start {
        next = next.checked_add_signed(step)?;
    }
    Some(next)
}
