use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SeriesError {
    #[error("Not enough data for a trend: points in {found} distinct year(s), at least 2 needed.")]
    InsufficientData { found: usize },

    #[error("Invalid year range: {from} is after {to}.")]
    InvalidRange { from: i32, to: i32 },
}
