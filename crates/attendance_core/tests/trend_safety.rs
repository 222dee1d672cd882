use attendance_core::{
    overall_trend, safety_info, trend, what_if, FixedClock, MemoryKvStore, NewSubject,
    SafetyInfo, StoreConfig, SubjectStore, TrendGranularity,
};
use chrono::{TimeZone, Utc};

fn at(month: u32, day: u32) -> i64 {
    Utc.with_ymd_and_hms(2026, month, day, 10, 0, 0)
        .unwrap()
        .timestamp_millis()
}

fn new_subject(name: &str) -> NewSubject {
    NewSubject {
        name: name.to_string(),
        professor: String::new(),
        color: "#f97316".to_string(),
        timetable: Vec::new(),
    }
}

#[test]
fn trend_sorts_history_before_bucketing() {
    let kv = MemoryKvStore::new();
    let clock = FixedClock::new(at(10, 20));
    let mut store = SubjectStore::load(&kv, &clock, StoreConfig::default()).unwrap();
    let id = store.add_subject(new_subject("Maths")).unwrap().unwrap();

    // Marks arrive out of chronological order.
    for (month, day, present) in [
        (10, 20, true),
        (10, 13, false),
        (10, 14, true),
        (10, 21, false),
        (10, 22, true),
        (9, 30, true),
    ] {
        clock.set(at(month, day));
        if present {
            store.mark_present(&id).unwrap();
        } else {
            store.mark_absent(&id).unwrap();
        }
    }
    let history = store.subject(&id).unwrap().history();

    let weekly = trend(history, TrendGranularity::Weekly, &Utc);
    assert_eq!(
        weekly.labels,
        vec![
            "2026-09-28 to 2026-10-04",
            "2026-10-12 to 2026-10-18",
            "2026-10-19 to 2026-10-25",
        ]
    );
    assert_eq!(weekly.percentages[0], 100.0);
    assert_eq!(weekly.percentages[1], 50.0);
    assert!((weekly.percentages[2] - 200.0 / 3.0).abs() < 1e-9);

    let daily = trend(history, TrendGranularity::Daily, &Utc);
    assert_eq!(daily.len(), 6);
    assert_eq!(daily.labels[0], "2026-09-30");
    assert_eq!(daily.labels[5], "2026-10-22");
    assert_eq!(daily.percentages, vec![100.0, 0.0, 100.0, 100.0, 0.0, 100.0]);

    let monthly = trend(history, TrendGranularity::Monthly, &Utc);
    assert_eq!(monthly.labels, vec!["Sep 2026", "Oct 2026"]);
    assert_eq!(monthly.percentages, vec![100.0, 60.0]);
}

#[test]
fn trend_of_empty_history_is_empty() {
    let series = trend(&[], TrendGranularity::default(), &Utc);
    assert!(series.is_empty());
    assert!(series.percentages.is_empty());
}

#[test]
fn overall_trend_merges_every_subject() {
    let kv = MemoryKvStore::new();
    let clock = FixedClock::new(at(10, 5));
    let mut store = SubjectStore::load(&kv, &clock, StoreConfig::default()).unwrap();
    let maths = store.add_subject(new_subject("Maths")).unwrap().unwrap();
    let physics = store.add_subject(new_subject("Physics")).unwrap().unwrap();

    store.mark_present(&maths).unwrap();
    store.mark_absent(&physics).unwrap();
    clock.set(at(11, 2));
    store.mark_present(&physics).unwrap();

    let series = overall_trend(store.subjects(), TrendGranularity::Monthly, &Utc);
    assert_eq!(series.labels, vec!["Oct 2026", "Nov 2026"]);
    assert_eq!(series.percentages, vec![50.0, 100.0]);
}

#[test]
fn safety_at_exact_threshold_has_no_spare_absences() {
    assert_eq!(safety_info(3, 4), SafetyInfo::Safe { bunkable: 0 });
    assert!(safety_info(3, 4).is_safe());
    assert_eq!(
        safety_info(3, 4).message(),
        "You can bunk 0 more class(es)."
    );
}

#[test]
fn safety_below_threshold_counts_classes_to_recover() {
    let info = safety_info(2, 4);
    assert_eq!(info, SafetyInfo::Unsafe { needed: 4 });
    assert!(!info.is_safe());
    assert_eq!(info.message(), "Attend the next 4 class(es) to recover.");
}

#[test]
fn safety_without_classes_is_not_applicable() {
    assert_eq!(safety_info(0, 0), SafetyInfo::NotApplicable);
    assert!(!SafetyInfo::NotApplicable.is_safe());
    assert_eq!(
        SafetyInfo::NotApplicable.message(),
        "Mark attendance to see stats"
    );
}

#[test]
fn safety_counts_hold_against_brute_force() {
    for total in 1..=60u32 {
        for present in 0..=total {
            match safety_info(present, total) {
                SafetyInfo::Safe { bunkable } => {
                    let k = bunkable as u32;
                    assert!(4 * present >= 3 * (total + k));
                    assert!(4 * present < 3 * (total + k + 1));
                }
                SafetyInfo::Unsafe { needed } => {
                    let n = needed as u32;
                    assert!(4 * (present + n) >= 3 * (total + n));
                    assert!(n == 0 || 4 * (present + n - 1) < 3 * (total + n - 1));
                }
                SafetyInfo::NotApplicable => panic!("total {total} is positive"),
            }
        }
    }
}

#[test]
fn what_if_projects_future_classes() {
    let bleak = what_if(3, 4, 0, 4);
    assert_eq!((bleak.present, bleak.total), (3, 8));
    assert_eq!(bleak.percentage, 37.5);

    let hopeful = what_if(3, 4, 4, 0);
    assert_eq!((hopeful.present, hopeful.total), (7, 8));
    assert_eq!(hopeful.percentage, 87.5);

    assert_eq!(what_if(0, 0, 0, 0).percentage, 0.0);
}
