//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `attendance_core` linkage and storage bootstrap.
//! - Print a deterministic one-screen summary of the stored subjects.
//!
//! Reads `ATTENDANCE_DB` (SQLite path, default `attendance.sqlite3`) and the
//! core logging variables `ATTENDANCE_LOG_LEVEL` / `ATTENDANCE_LOG_DIR`.

use attendance_core::db::open_db;
use attendance_core::logging::LogSettings;
use attendance_core::{
    init_logging, overall_stats, safety_info, todays_schedule, SqliteKvStore, SubjectStore,
    Weekday,
};
use chrono::{Datelike, Local};
use std::process::ExitCode;

const DB_PATH_ENV: &str = "ATTENDANCE_DB";
const DEFAULT_DB_PATH: &str = "attendance.sqlite3";

fn main() -> ExitCode {
    println!("attendance_core ping={}", attendance_core::ping());
    println!("attendance_core version={}", attendance_core::core_version());

    let settings = LogSettings::from_env();
    if let Some(log_dir) = settings.log_dir.as_deref() {
        if let Err(err) = init_logging(&settings.level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = std::env::var(DB_PATH_ENV).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    let conn = open_db(&db_path)?;
    let store = SubjectStore::open(SqliteKvStore::new(&conn))?;
    let subjects = store.subjects();

    let overall = overall_stats(subjects);
    println!(
        "subjects={} present={} classes={} percentage={:.1}",
        subjects.len(),
        overall.total_present,
        overall.total_classes,
        overall.percentage
    );

    for subject in subjects {
        println!(
            "- {} ({:.1}%): {}",
            subject.name,
            subject.percentage(),
            safety_info(subject.present(), subject.total()).message()
        );
    }

    let today = Weekday::from(Local::now().weekday());
    for class in todays_schedule(subjects, today) {
        println!("today {} {}", class.slot.time, class.subject.name);
    }
    Ok(())
}
