//! Derived attendance views.
//!
//! # Responsibility
//! - Compute statistics, schedules, calendar grids, trends and safety
//!   projections from a read-only subject snapshot.
//!
//! # Invariants
//! - Nothing in this module mutates subjects or performs I/O.
//! - Local-date bucketing always uses the caller-provided time zone.

pub mod calendar;
pub mod safety;
pub mod schedule;
pub mod stats;
pub mod trend;
