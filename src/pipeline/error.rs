//! Error types for the analysis pipeline.
//!
//! Every pipeline stage fails fast with a [`PipelineError`]. The stages are pure
//! functions of their input, so retrying with the same frame always reproduces the
//! same error.
//!
//! An empty result after outlier filtering is *not* an error; see
//! [`OutlierFilterResult::is_empty`](super::OutlierFilterResult::is_empty).

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by the pipeline stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A column the stage depends on is absent from the input frame.
    #[error("Required column '{column}' not found. Available columns: {available:?}")]
    Schema {
        /// Name of the missing column
        column: String,
        /// Columns that were present
        available: Vec<String>,
    },

    /// A column holds data that cannot be used in a numeric computation.
    #[error("Column '{column}' has type {dtype}, expected numeric or boolean data")]
    Type {
        /// Offending column
        column: String,
        /// Its polars dtype, rendered
        dtype: String,
    },

    /// A category column holds a value that is not a whole number.
    #[error("Column '{column}' holds non-integral value {value}, expected integer category codes")]
    NonIntegral { column: String, value: f64 },

    /// The correlation builder needs at least two columns.
    #[error("Correlation requires at least 2 columns, found {found}")]
    InsufficientColumns { found: usize },

    /// Outlier percentiles outside `0.0..=1.0` or in the wrong order.
    #[error("Invalid percentile range: lower {lower} and upper {upper} must satisfy 0 <= lower <= upper <= 1")]
    InvalidQuantiles { lower: f64, upper: f64 },

    /// Failure inside polars itself.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Result alias used throughout the pipeline.
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_available_columns() {
        let err = PipelineError::Schema {
            column: "cardio".to_string(),
            available: vec!["id".to_string(), "age".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'cardio'"));
        assert!(msg.contains("\"id\""));
    }

    #[test]
    fn test_type_error_message() {
        let err = PipelineError::Type {
            column: "gender".to_string(),
            dtype: "str".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Column 'gender' has type str, expected numeric or boolean data"
        );
    }
}
