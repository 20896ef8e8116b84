//! iCalendar output: one recurring VEVENT per meeting schedule.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use icalendar::{Calendar, Component, Event, EventLike, Property};
use meeting_engine::{Meeting, Schedule};
use tracing::{info, warn};

/// Product identifier stamped on every generated calendar.
pub const PRODID: &str = "-//meetcal//meeting agendas//EN";

/// Calendar-level metadata for combined output.
#[derive(Debug, Default, Clone)]
pub struct CalendarInfo {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Build one calendar holding every schedule of every meeting.
pub fn build_calendar(meetings: &[Meeting], meta: &CalendarInfo) -> Calendar {
    let mut cal = Calendar::empty();
    cal.append_property(Property::new("VERSION", "2.0"));
    cal.append_property(Property::new("PRODID", PRODID));
    if let Some(name) = &meta.name {
        cal.name(name);
    }
    if let Some(description) = &meta.description {
        cal.description(description);
    }
    for meeting in meetings {
        for (index, schedule) in meeting.schedules().iter().enumerate() {
            cal.push(schedule_event(meeting, index, schedule));
        }
    }
    cal.done()
}

fn schedule_event(meeting: &Meeting, index: usize, schedule: &Schedule) -> Event {
    let mut event = Event::new();
    event.uid(&event_uid(meeting, index));
    event.summary(meeting.name());
    event.location(&format!("#{}", schedule.channel()));
    event.description(&event_description(meeting));
    event.starts(schedule.next_occurrence());
    event.add_property("RRULE", schedule.recurrence().rrule());
    event.add_property("DURATION", format!("PT{}M", schedule.duration_minutes()));
    event.done()
}

/// Stable per-schedule identifier, so regenerated calendars update in place.
fn event_uid(meeting: &Meeting, index: usize) -> String {
    let stem = meeting.output_file_name();
    let stem = stem.trim_end_matches(".ics");
    format!("{}-{}-{}@meetcal", stem, slug(meeting.name()), index)
}

fn slug(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn event_description(meeting: &Meeting) -> String {
    let mut lines = vec![
        format!("Project: {}", meeting.name()),
        format!("Chair: {}", meeting.chair()),
        format!("Description: {}", meeting.description().trim()),
    ];
    if let Some(url) = meeting.extra_str("agenda_url") {
        lines.push(format!("Agenda URL: {}", url));
    }
    if let Some(url) = meeting.extra_str("project_url") {
        lines.push(format!("Project URL: {}", url));
    }
    lines.join("\n")
}

fn write_calendar(cal: &Calendar, path: &Path) -> Result<()> {
    fs::write(path, cal.to_string())
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Write all meetings into a single calendar file.
pub fn write_combined(meetings: &[Meeting], meta: &CalendarInfo, path: &Path) -> Result<()> {
    write_calendar(&build_calendar(meetings, meta), path)?;
    info!(meetings = meetings.len(), path = %path.display(), "wrote calendar");
    Ok(())
}

/// Write one calendar file per meeting into `dir`, named after each meeting's source.
pub fn write_per_meeting(meetings: &[Meeting], dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let mut written: HashMap<String, &str> = HashMap::new();
    for meeting in meetings {
        let file_name = meeting.output_file_name();
        if let Some(previous) = written.insert(file_name.clone(), meeting.name()) {
            warn!(
                file = %file_name,
                previous,
                meeting = meeting.name(),
                "overwriting calendar written for another meeting"
            );
        }
        let cal = build_calendar(std::slice::from_ref(meeting), &CalendarInfo::default());
        write_calendar(&cal, &dir.join(&file_name))?;
    }
    info!(meetings = meetings.len(), dir = %dir.display(), "wrote calendars");
    Ok(())
}
