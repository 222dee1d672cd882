use attendance_core::{
    check_daily_cap, marks_on_date, per_subject_daily_cap, reminder_times, todays_schedule,
    FixedClock, MemoryKvStore, NewSubject, StoreConfig, SubjectStore, TimetableSlot, Weekday,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};

fn subject(name: &str, slots: &[(Weekday, &str)]) -> NewSubject {
    NewSubject {
        name: name.to_string(),
        professor: String::new(),
        color: "#14b8a6".to_string(),
        timetable: slots
            .iter()
            .map(|(day, time)| TimetableSlot::new(*day, *time))
            .collect(),
    }
}

fn monday(hour: u32, minute: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, hour, minute, 0).unwrap()
}

#[test]
fn schedule_lists_todays_slots_in_time_order() {
    let kv = MemoryKvStore::new();
    let mut store = SubjectStore::load(&kv, FixedClock::new(0), StoreConfig::default()).unwrap();
    store
        .add_subject(subject(
            "Maths",
            &[(Weekday::Mon, "14:00"), (Weekday::Mon, "09:00")],
        ))
        .unwrap();
    store
        .add_subject(subject(
            "Physics",
            &[(Weekday::Wed, "09:00"), (Weekday::Mon, "11:00")],
        ))
        .unwrap();
    store
        .add_subject(subject("Chemistry", &[(Weekday::Mon, "09:00")]))
        .unwrap();

    let schedule = todays_schedule(store.subjects(), Weekday::Mon);
    let rows: Vec<(&str, &str)> = schedule
        .iter()
        .map(|class| (class.subject.name.as_str(), class.slot.time.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Maths", "09:00"),
            ("Chemistry", "09:00"),
            ("Physics", "11:00"),
            ("Maths", "14:00"),
        ]
    );

    assert!(todays_schedule(store.subjects(), Weekday::Sun).is_empty());
}

#[test]
fn daily_cap_counts_slots_on_the_weekday() {
    let kv = MemoryKvStore::new();
    let mut store = SubjectStore::load(&kv, FixedClock::new(0), StoreConfig::default()).unwrap();
    let id = store
        .add_subject(subject(
            "Maths",
            &[(Weekday::Mon, "09:00"), (Weekday::Mon, "14:00"), (Weekday::Fri, "10:00")],
        ))
        .unwrap()
        .unwrap();

    let maths = store.subject(&id).unwrap();
    assert_eq!(per_subject_daily_cap(maths, Weekday::Mon), 2);
    assert_eq!(per_subject_daily_cap(maths, Weekday::Fri), 1);
    assert_eq!(per_subject_daily_cap(maths, Weekday::Tue), 0);
}

#[test]
fn cap_check_rejects_once_todays_slots_are_marked() {
    let kv = MemoryKvStore::new();
    let clock = FixedClock::new(monday(9, 5).timestamp_millis());
    let mut store = SubjectStore::load(&kv, &clock, StoreConfig::default()).unwrap();
    let id = store
        .add_subject(subject(
            "Maths",
            &[(Weekday::Mon, "09:00"), (Weekday::Mon, "14:00")],
        ))
        .unwrap()
        .unwrap();
    let now = monday(15, 0);

    assert!(check_daily_cap(store.subject(&id).unwrap(), &now).is_ok());
    store.mark_present(&id).unwrap();
    clock.set(monday(14, 5).timestamp_millis());
    store.mark_absent(&id).unwrap();

    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    assert_eq!(marks_on_date(store.subject(&id).unwrap(), today, &Utc), 2);

    let rejected = check_daily_cap(store.subject(&id).unwrap(), &now).unwrap_err();
    assert_eq!(rejected.subject_id, id);
    assert_eq!(rejected.cap, 2);
    assert_eq!(rejected.marked, 2);

    // Next Monday the count starts over.
    let next_week = now + Duration::days(7);
    assert!(check_daily_cap(store.subject(&id).unwrap(), &next_week).is_ok());
}

#[test]
fn subjects_without_slots_today_are_never_capped() {
    let kv = MemoryKvStore::new();
    let clock = FixedClock::new(monday(9, 0).timestamp_millis());
    let mut store = SubjectStore::load(&kv, &clock, StoreConfig::default()).unwrap();
    let id = store
        .add_subject(subject("Lab", &[(Weekday::Thu, "10:00")]))
        .unwrap()
        .unwrap();
    for _ in 0..5 {
        store.mark_present(&id).unwrap();
    }

    assert!(check_daily_cap(store.subject(&id).unwrap(), &monday(18, 0)).is_ok());
}

#[test]
fn reminders_fire_fifteen_minutes_after_start() {
    let kv = MemoryKvStore::new();
    let mut store = SubjectStore::load(&kv, FixedClock::new(0), StoreConfig::default()).unwrap();
    store
        .add_subject(subject(
            "Maths",
            &[(Weekday::Mon, "09:00"), (Weekday::Mon, "14:00")],
        ))
        .unwrap();
    store
        .add_subject(subject("Physics", &[(Weekday::Mon, "11:00")]))
        .unwrap();
    let schedule = todays_schedule(store.subjects(), Weekday::Mon);

    let early = reminder_times(&schedule, &monday(9, 10));
    let fire_at: Vec<_> = early.iter().map(|reminder| reminder.fire_at).collect();
    assert_eq!(fire_at, vec![monday(9, 15), monday(11, 15), monday(14, 15)]);
    assert_eq!(early[1].class.subject.name, "Physics");

    let later = reminder_times(&schedule, &monday(9, 20));
    assert_eq!(later.len(), 2);
    assert_eq!(later[0].fire_at, monday(11, 15));

    assert!(reminder_times(&schedule, &monday(23, 0)).is_empty());
}
