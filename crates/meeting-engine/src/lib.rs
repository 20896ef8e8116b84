//! # meeting-engine
//!
//! Recurring meeting schedules and per-channel conflict detection.
//!
//! A [`Meeting`] owns one or more [`Schedule`]s, each a weekly slot on a channel.
//! Schedules are expanded into concrete [`MeetingInstance`]s over a bounded
//! [`ProjectionWindow`], and the instances sharing a channel are checked pairwise
//! for overlap. All computation is pure: the reference "now" and "today" are
//! always passed in by the caller.
//!
//! ## Modules
//!
//! - [`recurrence`] — weekly / biweekly repetition rules
//! - [`record`] — raw, unvalidated input records as handed over by a parser
//! - [`schedule`] — a validated recurring slot and its occurrence math
//! - [`meeting`] — a named activity owning its schedules
//! - [`expander`] — schedule + window → concrete occurrences
//! - [`conflict`] — overlap detection across all meetings, per channel
//! - [`error`] — Error types

pub mod conflict;
pub mod error;
pub mod expander;
pub mod meeting;
pub mod record;
pub mod recurrence;
pub mod schedule;

pub use conflict::{check, check_for_conflicts, find_all_conflicts, Conflict, ConflictReport};
pub use error::{ConflictError, EngineError, ValidationError};
pub use expander::{expand, MeetingInstance, Occurrences, ProjectionWindow, DEFAULT_WINDOW_DAYS};
pub use meeting::Meeting;
pub use record::{MeetingRecord, Scalar, ScheduleRecord};
pub use recurrence::RecurrenceRule;
pub use schedule::Schedule;
