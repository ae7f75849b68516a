//! Dataset Error Types

use thiserror::Error;

/// Errors while loading or splitting a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// CSV file could not be read or parsed
    #[error("Failed to read dataset from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// No rows survived loading
    #[error("Dataset is empty")]
    Empty,

    /// Split fraction outside (0, 1)
    #[error("Invalid test fraction {0}, must be in (0, 1)")]
    InvalidFraction(f64),
}
