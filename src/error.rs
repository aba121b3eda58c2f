//! Error types for survey preparation

use thiserror::Error;

/// Result type alias for survey operations
pub type Result<T> = std::result::Result<T, SurveyError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum SurveyError {
    #[error(
        "No item columns found (expected names starting with '{prefix}'); available columns: {}",
        .available.join(", ")
    )]
    NoItemColumns {
        prefix: String,
        available: Vec<String>,
    },

    #[error("Duplicate column '{name}' after normalization (from '{first}' and '{second}')")]
    DuplicateColumn {
        name: String,
        first: String,
        second: String,
    },

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Scaler not fitted")]
    NotFitted,

    #[error("Data error: {0}")]
    DataError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}

impl From<polars::error::PolarsError> for SurveyError {
    fn from(err: polars::error::PolarsError) -> Self {
        SurveyError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for SurveyError {
    fn from(err: serde_json::Error) -> Self {
        SurveyError::SerializationError(err.to_string())
    }
}

impl From<calamine::XlsxError> for SurveyError {
    fn from(err: calamine::XlsxError) -> Self {
        SurveyError::DataError(format!("xlsx read failed: {}", err))
    }
}

impl From<rust_xlsxwriter::XlsxError> for SurveyError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        SurveyError::DataError(format!("xlsx write failed: {}", err))
    }
}
