//! 75% safety margin and what-if projections.
//!
//! # Invariants
//! - `Safe { bunkable }` counts extra absences with `present` fixed and
//!   `total` growing: the largest `k` with `present / (total + k) >= 0.75`.
//! - `Unsafe { needed }` counts extra attended classes with both `present`
//!   and `total` growing: the smallest `n` with
//!   `(present + n) / (total + n) >= 0.75`.

/// Minimum percentage considered safe.
pub const SAFE_THRESHOLD_PERCENT: f64 = 75.0;

/// Safety status of one present/total pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyInfo {
    /// No classes recorded yet.
    NotApplicable,
    /// At or above the threshold; `bunkable` more absences keep it there.
    Safe { bunkable: u64 },
    /// Below the threshold; `needed` consecutive presents recover it.
    Unsafe { needed: u64 },
}

impl SafetyInfo {
    pub fn is_safe(self) -> bool {
        matches!(self, Self::Safe { .. })
    }

    /// User-facing one-line advice.
    pub fn message(self) -> String {
        match self {
            Self::NotApplicable => "Mark attendance to see stats".to_string(),
            Self::Safe { bunkable } => format!("You can bunk {bunkable} more class(es)."),
            Self::Unsafe { needed } => format!("Attend the next {needed} class(es) to recover."),
        }
    }
}

pub fn safety_info(present: u32, total: u32) -> SafetyInfo {
    if total == 0 {
        return SafetyInfo::NotApplicable;
    }

    let present = i64::from(present);
    let total = i64::from(total);
    // Integer form of `present / total * 100 >= 75`.
    if 4 * present >= 3 * total {
        let bunkable = (4 * present - 3 * total).div_euclid(3);
        SafetyInfo::Safe {
            bunkable: bunkable as u64,
        }
    } else {
        SafetyInfo::Unsafe {
            needed: (3 * total - 4 * present) as u64,
        }
    }
}

/// Attendance after hypothetical future classes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Projection {
    pub present: u32,
    pub total: u32,
    pub percentage: f64,
}

pub fn what_if(present: u32, total: u32, future_present: u32, future_absent: u32) -> Projection {
    let projected_present = present.saturating_add(future_present);
    let projected_total = total
        .saturating_add(future_present)
        .saturating_add(future_absent);
    Projection {
        present: projected_present,
        total: projected_total,
        percentage: crate::analytics::stats::percentage(projected_present, projected_total),
    }
}
