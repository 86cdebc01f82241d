//! # Jurimetria Core Types
//!
//! Layer 0 data model shared by every other crate: docket records, pre-aggregated
//! rows, group keys, per-group tallies and the congestion-rate formula.

pub mod enums;
pub mod rate;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Grouping, KeyColumn, PendingBasis, PolicyKind};
pub use rate::{congestion_rate, RATE_SCALE};
pub use structs::{AggregateRow, CaseRecord, GroupKey, GroupedMetric, Tally, TOTAL_LABEL};
