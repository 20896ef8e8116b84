//! Detect meetings that occupy the same channel at overlapping times.
//!
//! Every schedule of every meeting is expanded over the projection window, the
//! instances are grouped by channel, and each channel's instances are compared
//! pairwise. Channels are scanned in order of first appearance; within a channel,
//! instances keep the order meetings were supplied in, then chronological order.
//! Adjacent instances (one ends exactly when another starts) are NOT conflicts.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ConflictError;
use crate::expander::{expand, MeetingInstance};
use crate::meeting::Meeting;

/// Two overlapping instances on one channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub channel: String,
    /// The instance scanned first.
    pub first: MeetingInstance,
    pub second: MeetingInstance,
    pub overlap_minutes: i64,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const FORMAT: &str = "%Y-%m-%d %H:%M";
        write!(
            f,
            "Conflict: {} and {} overlap on #{} ({}-{} and {}-{} UTC)",
            self.first.owner_name,
            self.second.owner_name,
            self.channel,
            self.first.start.format(FORMAT),
            self.first.end.format("%H:%M"),
            self.second.start.format(FORMAT),
            self.second.end.format("%H:%M"),
        )
    }
}

/// Outcome of a conflict check.
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictReport {
    /// No two instances on any channel overlap.
    Clear,
    /// The first overlapping pair found.
    Conflict(Conflict),
}

impl ConflictReport {
    pub fn is_clear(&self) -> bool {
        matches!(self, ConflictReport::Clear)
    }

    pub fn conflict(&self) -> Option<&Conflict> {
        match self {
            ConflictReport::Clear => None,
            ConflictReport::Conflict(conflict) => Some(conflict),
        }
    }

    /// Turn a found conflict into an error for callers that halt on it.
    pub fn into_result(self) -> Result<(), ConflictError> {
        match self {
            ConflictReport::Clear => Ok(()),
            ConflictReport::Conflict(conflict) => Err(conflict.into()),
        }
    }
}

/// Instances of one channel, in scan order.
struct ChannelInstances {
    channel: String,
    instances: Vec<MeetingInstance>,
}

/// Expand every schedule and group the instances by channel, in order of first
/// appearance of each channel.
fn group_by_channel(
    meetings: &[Meeting],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<ChannelInstances> {
    let mut groups: Vec<ChannelInstances> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for meeting in meetings {
        for schedule in meeting.schedules() {
            let slot = *index
                .entry(schedule.channel().to_string())
                .or_insert_with(|| {
                    groups.push(ChannelInstances {
                        channel: schedule.channel().to_string(),
                        instances: Vec::new(),
                    });
                    groups.len() - 1
                });

            let before = groups[slot].instances.len();
            groups[slot]
                .instances
                .extend(expand(schedule, window_start, window_end));
            debug!(
                meeting = meeting.name(),
                channel = schedule.channel(),
                occurrences = groups[slot].instances.len() - before,
                "expanded schedule"
            );
        }
    }

    groups
}

/// Pairwise scan of one channel, calling `on_conflict` for every overlapping
/// pair until it returns `false`.
fn scan_channel(group: &ChannelInstances, mut on_conflict: impl FnMut(Conflict) -> bool) -> bool {
    let instances = &group.instances;
    for i in 0..instances.len() {
        for j in (i + 1)..instances.len() {
            let (a, b) = (&instances[i], &instances[j]);
            if a.overlaps(b) {
                let keep_going = on_conflict(Conflict {
                    channel: group.channel.clone(),
                    first: a.clone(),
                    second: b.clone(),
                    overlap_minutes: a.overlap_minutes(b),
                });
                if !keep_going {
                    return false;
                }
            }
        }
    }
    true
}

/// Report the first conflicting pair across all channels, or `Clear`.
///
/// Scanning stops at the first hit.
pub fn check(
    meetings: &[Meeting],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> ConflictReport {
    let groups = group_by_channel(meetings, window_start, window_end);

    for group in &groups {
        debug!(
            channel = group.channel.as_str(),
            instances = group.instances.len(),
            "scanning channel"
        );
        let mut found = None;
        scan_channel(group, |conflict| {
            found = Some(conflict);
            false
        });
        if let Some(conflict) = found {
            warn!(
                channel = conflict.channel.as_str(),
                first = conflict.first.owner_name.as_str(),
                second = conflict.second.owner_name.as_str(),
                "meeting conflict detected"
            );
            return ConflictReport::Conflict(conflict);
        }
    }

    ConflictReport::Clear
}

/// Like [`check`], but returns the conflict as an error.
///
/// # Errors
/// Returns `ConflictError` carrying the first conflicting pair.
pub fn check_for_conflicts(
    meetings: &[Meeting],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<(), ConflictError> {
    check(meetings, window_start, window_end).into_result()
}

/// Every conflicting pair across all channels, in the same scan order as [`check`].
pub fn find_all_conflicts(
    meetings: &[Meeting],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for group in &group_by_channel(meetings, window_start, window_end) {
        scan_channel(group, |conflict| {
            conflicts.push(conflict);
            true
        });
    }
    conflicts
}
