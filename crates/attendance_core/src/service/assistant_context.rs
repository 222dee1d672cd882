//! Context handed to the study-assistant collaborator.
//!
//! # Responsibility
//! - Summarize subjects as `{name, percentage, status}` rows.
//! - Render note text for one focused subject.
//!
//! # Invariants
//! - Only names, percentages, statuses and note text leave the core;
//!   ids, history and timetables do not.

use crate::analytics::safety::SAFE_THRESHOLD_PERCENT;
use crate::model::subject::Subject;
use serde::{Serialize, Serializer};

const STATUS_SAFE: &str = "Safe";
const STATUS_NEEDS_ATTENTION: &str = "Needs attention";
const NOTE_SEPARATOR: &str = "\n\n---\n\n";

/// Per-subject attendance summary row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectSummary {
    pub name: String,
    /// `None` when no classes are recorded.
    ///
    /// Serialized as one-decimal text (`"66.7"`), or the number `0` without
    /// classes; the assistant prompt has always received that shape.
    #[serde(serialize_with = "serialize_percentage")]
    pub percentage: Option<f64>,
    pub status: &'static str,
}

fn serialize_percentage<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(percentage) => serializer.serialize_str(&format!("{percentage:.1}")),
        None => serializer.serialize_u8(0),
    }
}

pub fn subject_summaries(subjects: &[Subject]) -> Vec<SubjectSummary> {
    subjects
        .iter()
        .map(|subject| {
            let percentage = (subject.total() > 0).then(|| subject.percentage());
            let needs_attention = percentage.is_some_and(|value| value < SAFE_THRESHOLD_PERCENT);
            SubjectSummary {
                name: subject.name.clone(),
                percentage,
                status: if needs_attention {
                    STATUS_NEEDS_ATTENTION
                } else {
                    STATUS_SAFE
                },
            }
        })
        .collect()
}

/// Notes of one subject as `Note Title: <title>\n\n<content>` blocks.
///
/// Returns `None` when the subject has no notes.
pub fn notes_context(subject: &Subject) -> Option<String> {
    if subject.notes.is_empty() {
        return None;
    }
    let blocks: Vec<String> = subject
        .notes
        .iter()
        .map(|note| format!("Note Title: {}\n\n{}", note.title, note.content))
        .collect();
    Some(blocks.join(NOTE_SEPARATOR))
}

/// Full context block: the summary table, plus notes of `focus_subject_id`.
pub fn build_assistant_context(subjects: &[Subject], focus_subject_id: Option<&str>) -> String {
    let summaries = subject_summaries(subjects);
    let table = serde_json::to_string_pretty(&summaries).unwrap_or_else(|_| "[]".to_string());
    let mut context = format!("Here is the user's current attendance data:\n{table}\n\n");

    let focused = focus_subject_id.and_then(|id| subjects.iter().find(|subject| subject.id == id));
    if let Some(subject) = focused {
        if let Some(notes) = notes_context(subject) {
            context.push_str(&format!(
                "Notes for {}:\n---\n{}\n---\n\n",
                subject.name, notes
            ));
        }
    }
    context
}
