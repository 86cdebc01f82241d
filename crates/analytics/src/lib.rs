//! # Jurimetria Analytics
//!
//! Turns a record store into per-group docket metrics for one jurisdiction and
//! reference year, and appends the consolidated totals row.
//!
//! ## Public API
//!
//! - `StatisticsEngine`: event data counted through an `AccountingPolicy`.
//! - `AggregateEngine`: pre-aggregated rows served as they are.
//! - `StatisticsSource`: the query surface both engines share.
//! - `MetricsTable`: the ordered rows plus totals.

pub mod aggregate;
pub mod engine;
pub mod grouping;
pub mod table;
pub mod totals;

pub use aggregate::AggregateEngine;
pub use engine::StatisticsEngine;
pub use grouping::group_records;
pub use table::MetricsTable;
pub use totals::synthesize_total;

/// Read-only queries a presentation layer may issue against loaded data.
pub trait StatisticsSource: Send + Sync {
    /// Sorted jurisdiction names present in the data.
    fn available_jurisdictions(&self) -> Vec<String>;

    /// Sorted reference years present in the data.
    fn available_years(&self) -> Vec<i32>;

    /// The metrics table for one jurisdiction and year, in the source's grouping.
    fn table(&self, jurisdiction: &str, year: i32) -> MetricsTable;
}
