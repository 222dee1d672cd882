//! Attendance domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the persisted JSON wire shape of subjects.
//!
//! # Invariants
//! - Every subject is identified by a stable `SubjectId`.
//! - History is append-only except for undo of the last record.

pub mod subject;
