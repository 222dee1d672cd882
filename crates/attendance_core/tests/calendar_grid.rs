use attendance_core::{
    build_calendar_grid, shift_month, CalendarError, FixedClock, HeatTier, MemoryKvStore,
    NewSubject, StoreConfig, Subject, SubjectStore, WeekStart,
};
use chrono::{Datelike, NaiveDate, TimeZone, Utc};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn marked_subjects(marks: &[(u32, u32, bool)]) -> Vec<Subject> {
    let kv = MemoryKvStore::new();
    let clock = FixedClock::new(0);
    let mut store = SubjectStore::load(&kv, &clock, StoreConfig::default()).unwrap();
    let id = store
        .add_subject(NewSubject {
            name: "Maths".to_string(),
            professor: String::new(),
            color: "#a855f7".to_string(),
            timetable: Vec::new(),
        })
        .unwrap()
        .unwrap();
    for &(month, day, present) in marks {
        let at = Utc.with_ymd_and_hms(2026, month, day, 10, 0, 0).unwrap();
        clock.set(at.timestamp_millis());
        if present {
            store.mark_present(&id).unwrap();
        } else {
            store.mark_absent(&id).unwrap();
        }
    }
    store.subjects().to_vec()
}

#[test]
fn october_2026_with_monday_start() {
    let grid = build_calendar_grid(&[], 2026, 10, WeekStart::Monday, &Utc).unwrap();
    assert_eq!(grid.len(), 35);
    assert_eq!(grid[0].date, date(2026, 9, 28));
    assert!(!grid[2].is_current_month);
    assert_eq!(grid[3].date, date(2026, 10, 1));
    assert!(grid[3].is_current_month);
    assert_eq!(grid[34].date, date(2026, 11, 1));
    assert!(!grid[34].is_current_month);
}

#[test]
fn october_2026_with_sunday_start() {
    let grid = build_calendar_grid(&[], 2026, 10, WeekStart::Sunday, &Utc).unwrap();
    assert_eq!(grid.len(), 35);
    assert_eq!(grid[0].date, date(2026, 9, 27));
    assert_eq!(grid[4].date, date(2026, 10, 1));
    assert_eq!(grid[34].date, date(2026, 10, 31));
}

#[test]
fn february_2026_fits_four_sunday_weeks() {
    let sunday = build_calendar_grid(&[], 2026, 2, WeekStart::Sunday, &Utc).unwrap();
    assert_eq!(sunday.len(), 28);
    assert!(sunday.iter().all(|day| day.is_current_month));

    let monday = build_calendar_grid(&[], 2026, 2, WeekStart::Monday, &Utc).unwrap();
    assert_eq!(monday.len(), 35);
    assert_eq!(monday[0].date, date(2026, 1, 26));
    assert_eq!(monday[34].date, date(2026, 3, 1));
}

#[test]
fn every_grid_is_whole_weeks_with_ordered_month_days() {
    let (mut year, mut month) = (2024, 1);
    for _ in 0..48 {
        for week_start in [WeekStart::Monday, WeekStart::Sunday] {
            let grid = build_calendar_grid(&[], year, month, week_start, &Utc).unwrap();
            assert_eq!(grid.len() % 7, 0, "{year}-{month} {week_start:?}");

            let days: Vec<u32> = grid
                .iter()
                .filter(|day| day.is_current_month)
                .map(|day| day.day_of_month)
                .collect();
            let expected_len = date(year, month, 1)
                .checked_add_months(chrono::Months::new(1))
                .unwrap()
                .pred_opt()
                .unwrap()
                .day();
            assert_eq!(days, (1..=expected_len).collect::<Vec<_>>());

            let first_weekday = grid[0].date.weekday();
            match week_start {
                WeekStart::Monday => assert_eq!(first_weekday, chrono::Weekday::Mon),
                WeekStart::Sunday => assert_eq!(first_weekday, chrono::Weekday::Sun),
            }
        }
        (year, month) = shift_month(year, month, 1);
    }
}

#[test]
fn days_carry_aggregates_only_when_marked() {
    let subjects = marked_subjects(&[
        (10, 5, true),
        (10, 5, true),
        (10, 5, false),
        (10, 6, false),
        (9, 30, true),
        (11, 1, true),
    ]);
    let grid = build_calendar_grid(&subjects, 2026, 10, WeekStart::Monday, &Utc).unwrap();
    let cell = |day: NaiveDate| grid.iter().find(|cell| cell.date == day).unwrap();

    let fifth = cell(date(2026, 10, 5));
    let tally = fifth.attendance.unwrap();
    assert_eq!((tally.present, tally.total), (2, 3));
    assert_eq!(fifth.heat_tier(), HeatTier::Medium);

    assert_eq!(cell(date(2026, 10, 6)).heat_tier(), HeatTier::Lowest);
    assert_eq!(cell(date(2026, 10, 7)).attendance, None);
    assert_eq!(cell(date(2026, 10, 7)).heat_tier(), HeatTier::NoData);

    // Lead and trail padding never carry data, even when marks exist.
    assert_eq!(cell(date(2026, 9, 30)).attendance, None);
    assert_eq!(cell(date(2026, 11, 1)).attendance, None);
}

#[test]
fn today_flag_matches_the_given_date() {
    let grid = build_calendar_grid(&[], 2026, 10, WeekStart::Monday, &Utc).unwrap();
    let today = date(2026, 10, 19);
    let flagged: Vec<NaiveDate> = grid
        .iter()
        .filter(|cell| cell.is_today(today))
        .map(|cell| cell.date)
        .collect();
    assert_eq!(flagged, vec![today]);
}

#[test]
fn invalid_month_is_rejected() {
    let err = build_calendar_grid(&[], 2026, 13, WeekStart::Monday, &Utc).unwrap_err();
    assert_eq!(
        err,
        CalendarError::InvalidMonth {
            year: 2026,
            month: 13
        }
    );
    assert!(build_calendar_grid(&[], 2026, 0, WeekStart::Monday, &Utc).is_err());
}
