use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read docket source '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(
        "Docket source '{}' is missing required columns: {}",
        path.display(),
        columns.join(", ")
    )]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    #[error("Invalid loader settings: {0}")]
    InvalidSettings(String),
}
