//! Attendance aggregation over a store snapshot.
//!
//! # Responsibility
//! - Compute overall, today, per-weekday and per-timeframe tallies.
//! - Rank subjects for dashboard highlights.
//!
//! # Invariants
//! - Every function is a pure read of `&[Subject]`; nothing is cached.
//! - Percentages are `present / total * 100`, exactly `0.0` when `total == 0`.
//! - Weeks start on Monday for both weekday buckets and timeframe windows.

use crate::model::subject::{AttendanceRecord, Subject, Weekday};
use crate::time::bucket::{local_date, week_start_date, WeekStart};
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeZone};

/// Returns `present / total * 100`, or `0.0` when `total` is zero.
pub fn percentage(present: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(present) / f64::from(total) * 100.0
    }
}

/// Present/total counter with its derived percentage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttendanceTally {
    pub present: u32,
    pub total: u32,
    pub percentage: f64,
}

impl AttendanceTally {
    /// Counts one record and refreshes the percentage.
    pub fn add(&mut self, record: &AttendanceRecord) {
        self.total += 1;
        if record.status.is_present() {
            self.present += 1;
        }
        self.percentage = percentage(self.present, self.total);
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Self {
        let mut tally = Self::default();
        for record in records {
            tally.add(record);
        }
        tally
    }
}

/// Totals across every subject.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverallStats {
    pub total_present: u32,
    pub total_classes: u32,
    pub percentage: f64,
}

/// Marks recorded today, across all subjects regardless of timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodayStats {
    pub present: u32,
    pub marked: u32,
}

/// Tally for one weekday bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayOfWeekStats {
    pub day: Weekday,
    pub tally: AttendanceTally,
}

/// Tallies for the four calendar windows relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeframeStats {
    pub this_week: AttendanceTally,
    pub last_week: AttendanceTally,
    pub this_month: AttendanceTally,
    pub last_month: AttendanceTally,
}

pub fn overall_stats(subjects: &[Subject]) -> OverallStats {
    let total_present = subjects.iter().map(Subject::present).sum();
    let total_classes = subjects.iter().map(Subject::total).sum();
    OverallStats {
        total_present,
        total_classes,
        percentage: percentage(total_present, total_classes),
    }
}

/// Counts records whose local date equals the local date of `now`.
pub fn todays_stats<Tz: TimeZone>(subjects: &[Subject], now: &DateTime<Tz>) -> TodayStats {
    let today = now.date_naive();
    let tz = now.timezone();
    let mut stats = TodayStats::default();
    for record in all_records(subjects) {
        if local_date(record.timestamp, &tz) == Some(today) {
            stats.marked += 1;
            if record.status.is_present() {
                stats.present += 1;
            }
        }
    }
    stats
}

/// Buckets every record into seven Monday-first weekday tallies.
pub fn attendance_by_day_of_week<Tz: TimeZone>(
    subjects: &[Subject],
    tz: &Tz,
) -> Vec<DayOfWeekStats> {
    let mut tallies = [AttendanceTally::default(); 7];
    for record in all_records(subjects) {
        if let Some(date) = local_date(record.timestamp, tz) {
            tallies[date.weekday().num_days_from_monday() as usize].add(record);
        }
    }

    Weekday::ALL
        .iter()
        .zip(tallies)
        .map(|(&day, tally)| DayOfWeekStats { day, tally })
        .collect()
}

/// Tallies this/last week and this/last month, evaluated on local dates.
///
/// "This" windows include every record on or after their start date.
/// "Last" windows are bounded above by the start of the current window.
pub fn attendance_for_timeframes<Tz: TimeZone>(
    subjects: &[Subject],
    now: &DateTime<Tz>,
) -> TimeframeStats {
    let windows = TimeframeWindows::at(now.date_naive());
    let tz = now.timezone();
    let mut stats = TimeframeStats::default();

    for record in all_records(subjects) {
        let Some(date) = local_date(record.timestamp, &tz) else {
            continue;
        };

        if date >= windows.this_week {
            stats.this_week.add(record);
        } else if date >= windows.last_week {
            stats.last_week.add(record);
        }

        if date >= windows.this_month {
            stats.this_month.add(record);
        } else if date >= windows.last_month {
            stats.last_month.add(record);
        }
    }
    stats
}

#[derive(Debug, Clone, Copy)]
struct TimeframeWindows {
    this_week: NaiveDate,
    last_week: NaiveDate,
    this_month: NaiveDate,
    last_month: NaiveDate,
}

impl TimeframeWindows {
    fn at(today: NaiveDate) -> Self {
        let this_week = week_start_date(today, WeekStart::Monday);
        let this_month = today.with_day(1).unwrap_or(today);
        Self {
            this_week,
            last_week: this_week.checked_sub_days(Days::new(7)).unwrap_or(this_week),
            this_month,
            last_month: this_month
                .checked_sub_months(Months::new(1))
                .unwrap_or(this_month),
        }
    }
}

/// Subject with the highest percentage; subjects without classes count as 0%.
///
/// Ties keep the earlier subject in display order.
pub fn most_attended_subject(subjects: &[Subject]) -> Option<&Subject> {
    subjects.iter().fold(None, |best: Option<&Subject>, subject| match best {
        Some(current) if current.percentage() >= subject.percentage() => Some(current),
        _ => Some(subject),
    })
}

/// Subject with the lowest percentage among those with recorded classes.
pub fn highest_risk_subject(subjects: &[Subject]) -> Option<&Subject> {
    subjects
        .iter()
        .filter(|subject| subject.total() > 0)
        .fold(None, |worst: Option<&Subject>, subject| match worst {
            Some(current) if current.percentage() <= subject.percentage() => Some(current),
            _ => Some(subject),
        })
}

fn all_records(subjects: &[Subject]) -> impl Iterator<Item = &AttendanceRecord> {
    subjects.iter().flat_map(|subject| subject.history().iter())
}
