//! Persistence collaborators.
//!
//! # Responsibility
//! - Define the key-value contract the subject store writes snapshots to.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`InvalidData`) in addition to
//!   transport errors.

pub mod kv_store;
