//! # Jurimetria Time Series
//!
//! Congestion-rate trends over a range of years, for the areas or court units
//! of a jurisdiction. Works over both event data and pre-aggregated rows.

pub mod builder;
pub mod error;
pub mod scope;

pub use builder::{default_range, SeriesBuilder, SeriesPoint, TimeSeries};
pub use error::SeriesError;
pub use scope::{normalize_area, AreaFilter, SeriesScope};
