//! Core use-case services.
//!
//! # Responsibility
//! - Own attendance state and orchestrate persistence write-back.
//! - Prepare data handed to outer collaborators (import, assistant).

pub mod assistant_context;
pub mod subject_store;
pub mod timetable_import;
