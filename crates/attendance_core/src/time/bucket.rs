//! Timestamp bucketing helpers.
//!
//! # Responsibility
//! - Map epoch-millisecond timestamps to local calendar dates.
//! - Produce day/week/month bucket labels for trend and calendar views.
//!
//! # Invariants
//! - Every in-range timestamp maps to exactly one key per granularity.
//! - Keys do not sort chronologically; callers keep first-seen order.
//! - Weeks run Monday through Sunday unless a `WeekStart` is passed.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone};

/// First column of a calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    /// Days between `date` and the start of its week.
    pub fn offset_of(self, date: NaiveDate) -> u32 {
        match self {
            Self::Monday => date.weekday().num_days_from_monday(),
            Self::Sunday => date.weekday().num_days_from_sunday(),
        }
    }
}

/// Converts epoch milliseconds into the local calendar date of `tz`.
///
/// Returns `None` only for timestamps outside chrono's representable range.
pub fn local_date<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|utc| utc.with_timezone(tz).date_naive())
}

/// First day of the week containing `date`.
pub fn week_start_date(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(week_start.offset_of(date))))
        .unwrap_or(date)
}

/// Calendar day label, `YYYY-MM-DD`.
pub fn day_key<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> Option<String> {
    local_date(timestamp_ms, tz).map(format_day)
}

/// Week label, `"<monday> to <sunday>"` with both ends as `YYYY-MM-DD`.
pub fn week_key<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> Option<String> {
    local_date(timestamp_ms, tz).map(|date| week_label(date, WeekStart::Monday))
}

/// Month label, `"<Mon> <YYYY>"` e.g. `"Oct 2026"`.
pub fn month_key<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> Option<String> {
    local_date(timestamp_ms, tz).map(|date| date.format("%b %Y").to_string())
}

/// Week label for an already-resolved local date.
pub fn week_label(date: NaiveDate, week_start: WeekStart) -> String {
    let first = week_start_date(date, week_start);
    let last = first.checked_add_days(Days::new(6)).unwrap_or(first);
    format!("{} to {}", format_day(first), format_day(last))
}

fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
