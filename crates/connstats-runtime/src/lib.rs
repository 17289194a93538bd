//! Runtime orchestration layer for connstats.
//!
//! Fans the per-file pipeline out over a bounded worker pool and merges
//! each file's local store into one global connection table.

pub mod coordinator;

pub use connstats_core as core;
pub use connstats_data as data;
