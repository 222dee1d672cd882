//! Time utilities shared by the store and analytics.
//!
//! # Responsibility
//! - Provide the `Clock` seam used to stamp mutations.
//! - Provide pure timestamp-to-bucket mappings.

pub mod bucket;
pub mod clock;
