//! Attendance trend series for charting.

use crate::analytics::stats::AttendanceTally;
use crate::model::subject::{AttendanceRecord, Subject};
use crate::time::bucket::{day_key, month_key, week_key};
use chrono::TimeZone;
use std::collections::HashMap;

/// Bucket size of a trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendGranularity {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl TrendGranularity {
    fn key<Tz: TimeZone>(self, timestamp_ms: i64, tz: &Tz) -> Option<String> {
        match self {
            Self::Daily => day_key(timestamp_ms, tz),
            Self::Weekly => week_key(timestamp_ms, tz),
            Self::Monthly => month_key(timestamp_ms, tz),
        }
    }
}

/// Parallel label/percentage sequences, oldest bucket first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub percentages: Vec<f64>,
}

impl TrendSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }
}

/// Groups one history into buckets and reports each bucket's percentage.
///
/// The history is sorted by timestamp first (stable, so equal timestamps keep
/// insertion order); bucket labels then appear in first-seen order.
pub fn trend<Tz: TimeZone>(
    history: &[AttendanceRecord],
    granularity: TrendGranularity,
    tz: &Tz,
) -> TrendSeries {
    let mut sorted: Vec<&AttendanceRecord> = history.iter().collect();
    sorted.sort_by_key(|record| record.timestamp);

    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, AttendanceTally> = HashMap::new();
    for record in sorted {
        let Some(key) = granularity.key(record.timestamp, tz) else {
            continue;
        };
        buckets
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                AttendanceTally::default()
            })
            .add(record);
    }

    let percentages = order
        .iter()
        .map(|key| buckets.get(key).map_or(0.0, |tally| tally.percentage))
        .collect();
    TrendSeries {
        labels: order,
        percentages,
    }
}

/// Trend over the combined history of every subject.
pub fn overall_trend<Tz: TimeZone>(
    subjects: &[Subject],
    granularity: TrendGranularity,
    tz: &Tz,
) -> TrendSeries {
    let combined: Vec<AttendanceRecord> = subjects
        .iter()
        .flat_map(|subject| subject.history().iter().cloned())
        .collect();
    trend(&combined, granularity, tz)
}
