//! Timetable import grouping.
//!
//! # Responsibility
//! - Turn a flat list of parsed timetable slots into per-subject groups.
//! - Assign display colors cyclically from a palette.
//!
//! # Invariants
//! - Groups keep the first-seen order of subject names.
//! - A `(day, time)` pair appears at most once per group.
//! - Slots without a subject name or with a malformed time are skipped.

use crate::model::subject::TimetableSlot;
use log::debug;

/// Display colors assigned to new subjects, in cycling order.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#6366f1", // indigo
    "#a855f7", // purple
    "#ec4899", // pink
    "#f97316", // orange
    "#22c55e", // green
    "#14b8a6", // teal
    "#3b82f6", // blue
    "#84cc16", // lime
];

/// One subject derived from import slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedSubject {
    pub name: String,
    pub professor: String,
    pub timetable: Vec<TimetableSlot>,
}

/// Color for the subject that will become number `existing_count` (0-based).
pub fn next_color<S: AsRef<str>>(existing_count: usize, palette: &[S]) -> Option<&str> {
    if palette.is_empty() {
        return None;
    }
    Some(palette[existing_count % palette.len()].as_ref())
}

/// Groups import slots by trimmed subject name.
///
/// The professor is the first non-blank teacher name seen for the subject.
/// Grouped slots carry only `day` and `time`.
pub fn group_import_slots(slots: &[TimetableSlot]) -> Vec<ImportedSubject> {
    let mut groups: Vec<ImportedSubject> = Vec::new();
    let mut skipped = 0usize;

    for slot in slots {
        let name = slot.subject_name.as_deref().map(str::trim).unwrap_or("");
        if name.is_empty() || slot.validate().is_err() {
            skipped += 1;
            continue;
        }

        let index = match groups.iter().position(|group| group.name == name) {
            Some(index) => index,
            None => {
                groups.push(ImportedSubject {
                    name: name.to_string(),
                    professor: String::new(),
                    timetable: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];

        let duplicate = group
            .timetable
            .iter()
            .any(|existing| existing.day == slot.day && existing.time == slot.time);
        if !duplicate {
            group
                .timetable
                .push(TimetableSlot::new(slot.day, slot.time.clone()));
        }

        if group.professor.is_empty() {
            if let Some(teacher) = slot.teacher_name.as_deref().map(str::trim) {
                group.professor = teacher.to_string();
            }
        }
    }

    debug!(
        "event=timetable_group module=import status=ok slots={} subjects={} skipped={}",
        slots.len(),
        groups.len(),
        skipped
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::{next_color, DEFAULT_PALETTE};

    #[test]
    fn next_color_cycles_through_palette() {
        assert_eq!(next_color(0, &DEFAULT_PALETTE), Some("#6366f1"));
        assert_eq!(next_color(8, &DEFAULT_PALETTE), Some("#6366f1"));
        assert_eq!(next_color(9, &DEFAULT_PALETTE), Some("#a855f7"));
        let empty: [&str; 0] = [];
        assert_eq!(next_color(3, &empty), None);
    }
}
