//! # Jurimetria Accounting Policies
//!
//! This crate holds the rules that turn docket events into distributed,
//! resolved and pending counts. It defines a universal `AccountingPolicy`
//! trait and provides the concrete policies.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** Pure functions over `CaseRecord`s. No I/O, no state
//!   carried between calls; every `(records, year)` pair is tallied from scratch.
//! - **Policy Agnostic Engine:** The statistics engine and the series builder
//!   only see `dyn AccountingPolicy`, so both policies flow through the same
//!   grouping, totals and suppression code.
//!
//! ## Public API
//!
//! - `AccountingPolicy`: The core trait all policies implement.
//! - `AnnualFlow`, `CumulativeStock`: the two policies.
//! - `create_policy`: The factory that builds the configured policy.

// Declare all the modules that constitute this crate.
pub mod annual_flow;
pub mod cumulative_stock;
pub mod factory;

// Re-export the key components to create a clean, public-facing API.
pub use annual_flow::AnnualFlow;
pub use cumulative_stock::{CumulativeStock, StockPosition};
pub use factory::create_policy;

use core_types::{CaseRecord, PolicyKind, Tally};
use std::fmt::Debug;

/// The core trait that all accounting policies must implement.
///
/// The `Send + Sync` bounds let one policy instance serve concurrent queries.
pub trait AccountingPolicy: Debug + Send + Sync {
    fn kind(&self) -> PolicyKind;

    /// Whether a record counts at all under this policy.
    ///
    /// Records without a distribution date never count.
    fn admits(&self, record: &CaseRecord) -> bool;

    /// Counts the given records for the reference `year`.
    ///
    /// Records the policy does not admit are ignored, so callers may pass an
    /// unfiltered group.
    fn tally(&self, records: &[&CaseRecord], year: i32) -> Tally;
}
