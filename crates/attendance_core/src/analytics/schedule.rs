//! Timetable-driven "today" views.
//!
//! # Responsibility
//! - Resolve which timetable slots fall on a given weekday.
//! - Expose the per-subject daily cap and the caller-side cap check.
//! - Derive reminder instants consumed by notification schedulers.
//!
//! # Invariants
//! - Schedule order is ascending by `HH:MM`, stable for equal times.
//! - A subject with no slots today has no cap and is never rejected.

use crate::model::subject::{Subject, SubjectId, TimetableSlot, Weekday};
use crate::time::bucket::local_date;
use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, TimeZone};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Delay after class start before a "did you attend?" reminder fires.
pub const REMINDER_DELAY_MINUTES: i64 = 15;

/// One timetable slot scheduled today, borrowed from the snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledClass<'a> {
    pub subject: &'a Subject,
    pub slot: &'a TimetableSlot,
}

/// Reminder for one scheduled class.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder<'a, Tz: TimeZone> {
    pub class: ScheduledClass<'a>,
    pub fire_at: DateTime<Tz>,
}

/// Rejection returned when a subject already has all of today's marks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCapExceeded {
    pub subject_id: SubjectId,
    pub cap: usize,
    pub marked: usize,
}

impl Display for DailyCapExceeded {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "subject {} already has {} of {} marks for today",
            self.subject_id, self.marked, self.cap
        )
    }
}

impl Error for DailyCapExceeded {}

/// Every `(subject, slot)` pair on `weekday`, sorted by slot time.
pub fn todays_schedule(subjects: &[Subject], weekday: Weekday) -> Vec<ScheduledClass<'_>> {
    let mut schedule: Vec<ScheduledClass<'_>> = subjects
        .iter()
        .flat_map(|subject| {
            subject
                .timetable
                .iter()
                .filter(move |slot| slot.day == weekday)
                .map(move |slot| ScheduledClass { subject, slot })
        })
        .collect();
    schedule.sort_by(|a, b| a.slot.time.cmp(&b.slot.time));
    schedule
}

/// Number of timetable slots the subject has on `weekday`.
pub fn per_subject_daily_cap(subject: &Subject, weekday: Weekday) -> usize {
    subject
        .timetable
        .iter()
        .filter(|slot| slot.day == weekday)
        .count()
}

/// Number of history records whose local date is `date`.
pub fn marks_on_date<Tz: TimeZone>(subject: &Subject, date: NaiveDate, tz: &Tz) -> usize {
    subject
        .history()
        .iter()
        .filter(|record| local_date(record.timestamp, tz) == Some(date))
        .count()
}

/// Gate callers run before `mark_present`/`mark_absent`.
///
/// Rejects only when the subject has a positive cap today and the number of
/// records already marked today has reached it.
pub fn check_daily_cap<Tz: TimeZone>(
    subject: &Subject,
    now: &DateTime<Tz>,
) -> Result<(), DailyCapExceeded> {
    let today = now.date_naive();
    let cap = per_subject_daily_cap(subject, Weekday::from(today.weekday()));
    if cap == 0 {
        return Ok(());
    }

    let marked = marks_on_date(subject, today, &now.timezone());
    if marked >= cap {
        return Err(DailyCapExceeded {
            subject_id: subject.id.clone(),
            cap,
            marked,
        });
    }
    Ok(())
}

/// Reminders still ahead of `now` for a schedule resolved for today.
///
/// Slots with a malformed time, or whose local time does not exist (DST
/// gap), produce no reminder.
pub fn reminder_times<'a, Tz: TimeZone>(
    schedule: &[ScheduledClass<'a>],
    now: &DateTime<Tz>,
) -> Vec<Reminder<'a, Tz>> {
    let today = now.date_naive();
    let tz = now.timezone();
    schedule
        .iter()
        .filter_map(|class| {
            let (hour, minute) = class.slot.hour_minute()?;
            let starts = today.and_hms_opt(hour, minute, 0)?;
            let fire_at = reminder_instant(tz.from_local_datetime(&starts))?;
            (fire_at > *now).then_some(Reminder {
                class: *class,
                fire_at,
            })
        })
        .collect()
}

/// Fire instant for a resolved class start.
///
/// A skipped local time has no instant; a repeated one uses the earlier.
fn reminder_instant<Tz: TimeZone>(class_start: LocalResult<DateTime<Tz>>) -> Option<DateTime<Tz>> {
    let start = match class_start {
        LocalResult::Single(at) => at,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => return None,
    };
    Some(start + Duration::minutes(REMINDER_DELAY_MINUTES))
}
