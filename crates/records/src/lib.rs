//! # Jurimetria Records
//!
//! The record stores the statistics engines read from, and the CSV loaders that
//! fill them.
//!
//! ## Architectural Principles
//!
//! - **Explicit schema:** Column names come from `configuration::SchemaMapping`
//!   and are resolved once per file. A file missing a required column fails to
//!   load with every missing name listed; nothing is guessed from substrings.
//! - **Lenient cells:** A bad date or count never rejects a file. Dates become
//!   absent, counts read as zero, and the loader logs how many cells it coerced.
//! - **Read-only after load:** `RecordStore` and `AggregateStore` expose no
//!   mutation, so they can be shared behind an `Arc` by concurrent queries.
//!
//! ## Public API
//!
//! - `RecordStore`, `AggregateStore`: the in-memory tables.
//! - `load_dataset`, `load_events`, `load_aggregates`: file loaders.
//! - `read_events`, `read_aggregates`: the same, over any `Read`.
//! - `LoadError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod loader;
pub mod parse;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use error::LoadError;
pub use loader::{load_aggregates, load_dataset, load_events, read_aggregates, read_events, Dataset};
pub use store::{AggregateStore, RecordStore};
