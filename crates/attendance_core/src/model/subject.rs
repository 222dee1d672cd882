//! Subject domain model.
//!
//! # Responsibility
//! - Define the canonical subject record and its attendance history.
//! - Keep the persisted JSON wire shape stable (camelCase field names).
//!
//! # Invariants
//! - `present <= total`.
//! - `total == history.len()` and `present` equals the number of
//!   `Present` records in `history`.
//! - `id` is stable and never reused for another subject.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static SLOT_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid slot time regex"));

/// Stable identifier for a subject.
///
/// New subjects get a uuid v4 string, but any unique string loaded from
/// persisted state is accepted.
pub type SubjectId = String;

/// Stable identifier for a note attached to a subject.
pub type NoteId = String;

/// Outcome of one attendance mark event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

/// One append-only attendance mark event.
///
/// `attendance_percentage_after` is a snapshot taken when the record was
/// appended and is never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub status: AttendanceStatus,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    pub attendance_percentage_after: f64,
}

/// Day of the week used by timetable slots.
///
/// Serialized with the three-letter names used by the persisted shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// Monday-first ordering used by every weekday aggregation.
    pub const ALL: [Weekday; 7] = [
        Self::Mon,
        Self::Tue,
        Self::Wed,
        Self::Thu,
        Self::Fri,
        Self::Sat,
        Self::Sun,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mon => "Mon",
            Self::Tue => "Tue",
            Self::Wed => "Wed",
            Self::Thu => "Thu",
            Self::Fri => "Fri",
            Self::Sat => "Sat",
            Self::Sun => "Sun",
        }
    }

    /// Zero-based index with Monday = 0.
    pub fn index_from_monday(self) -> usize {
        self as usize
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        Self::ALL[value.num_days_from_monday() as usize]
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Mon => chrono::Weekday::Mon,
            Weekday::Tue => chrono::Weekday::Tue,
            Weekday::Wed => chrono::Weekday::Wed,
            Weekday::Thu => chrono::Weekday::Thu,
            Weekday::Fri => chrono::Weekday::Fri,
            Weekday::Sat => chrono::Weekday::Sat,
            Weekday::Sun => chrono::Weekday::Sun,
        }
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation error for timetable slot shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValidationError {
    /// `time` is not a 24-hour `HH:MM` string.
    InvalidTime(String),
}

impl Display for SlotValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTime(value) => {
                write!(f, "timetable slot time `{value}` is not a 24-hour HH:MM value")
            }
        }
    }
}

impl Error for SlotValidationError {}

/// Weekly timetable entry.
///
/// Also used as the import payload before slots are grouped into subjects,
/// which is why `subject_name` and `teacher_name` are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableSlot {
    pub day: Weekday,
    /// 24-hour `HH:MM`. Lexical order equals chronological order.
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
}

impl TimetableSlot {
    /// Creates a schedule-only slot (no import metadata).
    pub fn new(day: Weekday, time: impl Into<String>) -> Self {
        Self {
            day,
            time: time.into(),
            subject_name: None,
            teacher_name: None,
        }
    }

    /// Checks the `HH:MM` shape. Day is already constrained by the type.
    pub fn validate(&self) -> Result<(), SlotValidationError> {
        if SLOT_TIME_RE.is_match(&self.time) {
            Ok(())
        } else {
            Err(SlotValidationError::InvalidTime(self.time.clone()))
        }
    }

    /// Returns `(hour, minute)` for a valid slot.
    pub fn hour_minute(&self) -> Option<(u32, u32)> {
        self.validate().ok()?;
        let (hour, minute) = self.time.split_once(':')?;
        Some((hour.parse().ok()?, minute.parse().ok()?))
    }
}

/// Study note owned by exactly one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub file_name: String,
    pub file_type: String,
    /// Unix epoch milliseconds.
    pub upload_date: i64,
}

/// Caller input for a new note; id and upload date are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub file_name: String,
    pub file_type: String,
}

/// Tracked course with its attendance history, timetable and notes.
///
/// `present` and `total` are a denormalized cache of `history`. They are
/// readable through accessors but only changed by the crate-internal
/// mutation helpers, which keep them consistent with the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub professor: String,
    present: u32,
    total: u32,
    history: Vec<AttendanceRecord>,
    pub color: String,
    #[serde(default)]
    pub timetable: Vec<TimetableSlot>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Subject {
    /// Creates an empty subject with a generated stable ID.
    ///
    /// # Invariants
    /// - Counters start at zero and history is empty.
    pub fn new(
        name: impl Into<String>,
        professor: impl Into<String>,
        color: impl Into<String>,
        timetable: Vec<TimetableSlot>,
    ) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, professor, color, timetable)
    }

    /// Creates an empty subject with a caller-provided ID.
    pub fn with_id(
        id: impl Into<SubjectId>,
        name: impl Into<String>,
        professor: impl Into<String>,
        color: impl Into<String>,
        timetable: Vec<TimetableSlot>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            professor: professor.into(),
            present: 0,
            total: 0,
            history: Vec::new(),
            color: color.into(),
            timetable,
            notes: Vec::new(),
        }
    }

    pub fn present(&self) -> u32 {
        self.present
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn history(&self) -> &[AttendanceRecord] {
        &self.history
    }

    /// Current attendance percentage, `0.0` when no classes are recorded.
    pub fn percentage(&self) -> f64 {
        crate::analytics::stats::percentage(self.present, self.total)
    }

    /// Appends one mark event stamped at `timestamp` and updates counters.
    pub(crate) fn record(&mut self, status: AttendanceStatus, timestamp: i64) -> &AttendanceRecord {
        self.total += 1;
        if status.is_present() {
            self.present += 1;
        }
        let index = self.history.len();
        self.history.push(AttendanceRecord {
            status,
            timestamp,
            attendance_percentage_after: self.percentage(),
        });
        &self.history[index]
    }

    /// Removes the last mark event, exactly reversing the append that produced it.
    ///
    /// Returns `None` when the history is empty.
    pub(crate) fn undo_last(&mut self) -> Option<AttendanceRecord> {
        let removed = self.history.pop()?;
        self.total = self.total.saturating_sub(1);
        if removed.status.is_present() {
            self.present = self.present.saturating_sub(1);
        }
        Some(removed)
    }

    /// Returns whether cached counters agree with the history.
    pub fn counters_consistent(&self) -> bool {
        let (present, total) = count_history(&self.history);
        self.present == present && self.total == total && self.present <= self.total
    }

    /// Rebuilds cached counters from the history.
    ///
    /// Returns `true` when the counters changed.
    pub(crate) fn recount(&mut self) -> bool {
        let (present, total) = count_history(&self.history);
        let changed = self.present != present || self.total != total;
        self.present = present;
        self.total = total;
        changed
    }
}

fn count_history(history: &[AttendanceRecord]) -> (u32, u32) {
    let present = history.iter().filter(|r| r.status.is_present()).count();
    (present as u32, history.len() as u32)
}
