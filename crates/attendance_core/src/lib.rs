//! Core domain logic for attendance tracking.
//! This crate is the single source of truth for attendance invariants.

pub mod analytics;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod time;

pub use analytics::calendar::{
    build_calendar_grid, shift_month, CalendarDay, CalendarError, HeatTier,
};
pub use analytics::safety::{safety_info, what_if, Projection, SafetyInfo, SAFE_THRESHOLD_PERCENT};
pub use analytics::schedule::{
    check_daily_cap, marks_on_date, per_subject_daily_cap, reminder_times, todays_schedule,
    DailyCapExceeded, Reminder, ScheduledClass,
};
pub use analytics::stats::{
    attendance_by_day_of_week, attendance_for_timeframes, highest_risk_subject,
    most_attended_subject, overall_stats, percentage, todays_stats, AttendanceTally,
    DayOfWeekStats, OverallStats, TimeframeStats, TodayStats,
};
pub use analytics::trend::{overall_trend, trend, TrendGranularity, TrendSeries};
pub use config::{StoreConfig, DEFAULT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::subject::{
    AttendanceRecord, AttendanceStatus, NewNote, Note, NoteId, SlotValidationError, Subject,
    SubjectId, TimetableSlot, Weekday,
};
pub use repo::kv_store::{KeyValueStore, KvError, KvResult, MemoryKvStore, SqliteKvStore};
pub use service::assistant_context::{
    build_assistant_context, subject_summaries, SubjectSummary,
};
pub use service::subject_store::{NewSubject, StoreError, StoreResult, SubjectStore};
pub use service::timetable_import::{
    group_import_slots, next_color, ImportedSubject, DEFAULT_PALETTE,
};
pub use time::bucket::{day_key, local_date, month_key, week_key, WeekStart};
pub use time::clock::{Clock, FixedClock, SystemClock};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
