//! Month-view calendar grid with daily attendance aggregates.
//!
//! # Responsibility
//! - Build a 7-column grid covering every week that overlaps a month.
//! - Attach per-day tallies over all subjects and map them to heat tiers.
//!
//! # Invariants
//! - Grid length is a multiple of 7.
//! - Exactly the month's day count of entries has `is_current_month`,
//!   in ascending day order.
//! - Lead/trail days never carry an aggregate; a target-month day without
//!   records has `attendance == None`, not a zero tally.

use crate::analytics::stats::AttendanceTally;
use crate::model::subject::Subject;
use crate::time::bucket::{local_date, WeekStart};
use chrono::{Datelike, Days, Months, NaiveDate, TimeZone};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Invalid calendar reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    InvalidMonth { year: i32, month: u32 },
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth { year, month } => {
                write!(f, "invalid calendar month {year}-{month:02}")
            }
        }
    }
}

impl Error for CalendarError {}

/// One grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day_of_month: u32,
    pub is_current_month: bool,
    pub attendance: Option<AttendanceTally>,
}

impl CalendarDay {
    fn padding(date: NaiveDate) -> Self {
        Self {
            date,
            day_of_month: date.day(),
            is_current_month: false,
            attendance: None,
        }
    }

    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.date == today
    }

    pub fn heat_tier(&self) -> HeatTier {
        HeatTier::for_attendance(self.attendance.as_ref())
    }
}

/// Heatmap intensity bucket for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeatTier {
    /// No records that day.
    NoData,
    /// Below 40%.
    Lowest,
    /// 40% and above.
    Low,
    /// 60% and above.
    Medium,
    /// 75% and above.
    High,
    /// 90% and above.
    Highest,
}

impl HeatTier {
    pub fn for_attendance(attendance: Option<&AttendanceTally>) -> Self {
        match attendance {
            None => Self::NoData,
            Some(tally) => Self::for_percentage(tally.percentage),
        }
    }

    pub fn for_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Self::Highest
        } else if percentage >= 75.0 {
            Self::High
        } else if percentage >= 60.0 {
            Self::Medium
        } else if percentage >= 40.0 {
            Self::Low
        } else {
            Self::Lowest
        }
    }
}

/// Builds the grid for `year`/`month` (1-based month).
///
/// Records are bucketed by their local date in `tz`; all subjects contribute.
pub fn build_calendar_grid<Tz: TimeZone>(
    subjects: &[Subject],
    year: i32,
    month: u32,
    week_start: WeekStart,
    tz: &Tz,
) -> Result<Vec<CalendarDay>, CalendarError> {
    let invalid = || CalendarError::InvalidMonth { year, month };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = first.checked_add_months(Months::new(1)).ok_or_else(invalid)?;
    let last = next_first.pred_opt().ok_or_else(invalid)?;

    let daily = daily_tallies(subjects, first, last, tz);
    let lead = week_start.offset_of(first);
    let mut grid = Vec::with_capacity(42);

    for back in (1..=lead).rev() {
        if let Some(date) = first.checked_sub_days(Days::new(u64::from(back))) {
            grid.push(CalendarDay::padding(date));
        }
    }

    for date in first.iter_days().take_while(|date| *date <= last) {
        grid.push(CalendarDay {
            date,
            day_of_month: date.day(),
            is_current_month: true,
            attendance: daily.get(&date).copied(),
        });
    }

    let trail = (7 - grid.len() % 7) % 7;
    for date in next_first.iter_days().take(trail) {
        grid.push(CalendarDay::padding(date));
    }

    Ok(grid)
}

/// Moves `(year, month)` by `offset` months, e.g. `(2026, 12) + 1 = (2027, 1)`.
pub fn shift_month(year: i32, month: u32, offset: i32) -> (i32, u32) {
    let index = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(offset);
    let shifted_year = index.div_euclid(12) as i32;
    let shifted_month = index.rem_euclid(12) as u32 + 1;
    (shifted_year, shifted_month)
}

fn daily_tallies<Tz: TimeZone>(
    subjects: &[Subject],
    first: NaiveDate,
    last: NaiveDate,
    tz: &Tz,
) -> HashMap<NaiveDate, AttendanceTally> {
    let mut daily: HashMap<NaiveDate, AttendanceTally> = HashMap::new();
    for record in subjects.iter().flat_map(|subject| subject.history()) {
        match local_date(record.timestamp, tz) {
            Some(date) if date >= first && date <= last => {
                daily.entry(date).or_default().add(record);
            }
            _ => {}
        }
    }
    daily
}

#[cfg(test)]
mod tests {
    use super::{shift_month, HeatTier};

    #[test]
    fn heat_tier_thresholds_are_inclusive() {
        assert_eq!(HeatTier::for_percentage(90.0), HeatTier::Highest);
        assert_eq!(HeatTier::for_percentage(89.9), HeatTier::High);
        assert_eq!(HeatTier::for_percentage(75.0), HeatTier::High);
        assert_eq!(HeatTier::for_percentage(60.0), HeatTier::Medium);
        assert_eq!(HeatTier::for_percentage(40.0), HeatTier::Low);
        assert_eq!(HeatTier::for_percentage(0.0), HeatTier::Lowest);
        assert_eq!(HeatTier::for_attendance(None), HeatTier::NoData);
    }

    #[test]
    fn shift_month_wraps_years() {
        assert_eq!(shift_month(2026, 12, 1), (2027, 1));
        assert_eq!(shift_month(2026, 1, -1), (2025, 12));
        assert_eq!(shift_month(2026, 10, -22), (2024, 12));
    }
}
