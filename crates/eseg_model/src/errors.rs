//! Error types for the Eseg model

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading data, fitting, evaluating or plotting.
#[derive(Debug, Error)]
pub enum EsegError {
    /// Dataset file could not be opened or read
    #[error("dataset resource not found at {path}: {source}")]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dataset file is not valid CSV
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// A column expected to hold numbers holds text
    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),

    /// A column expected to hold text holds numbers
    #[error("column '{0}' is not categorical")]
    NonCategoricalColumn(String),

    /// A numeric cell is empty in a column used for fitting
    #[error("missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    /// A used value is infinite or NaN
    #[error("non-finite value in column '{column}' at row {row}")]
    NonFiniteValue { column: String, row: usize },

    /// Table construction with ragged columns
    #[error("column '{column}' has {got} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        got: usize,
    },

    /// Not enough rows to fit or evaluate
    #[error("dataset too small: need at least {needed} rows, got {got}")]
    TooFewRows { needed: usize, got: usize },

    /// Prediction input with the wrong number of features
    #[error("row {row}: expected {expected} features, got {got}")]
    Shape {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// Kernel system could not be solved to a finite result
    #[error("numerical failure: {0}")]
    Numerical(String),

    /// Figure rendering failed
    #[error("plot rendering failed: {0}")]
    Plot(String),

    /// Configuration file could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for Eseg model operations
pub type Result<T> = std::result::Result<T, EsegError>;
