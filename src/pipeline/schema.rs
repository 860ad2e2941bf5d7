//! Column names of the medical examination dataset and schema checks

use polars::prelude::*;

use super::error::{PipelineError, Result};

pub const ID: &str = "id";
/// Age in days
pub const AGE: &str = "age";
pub const GENDER: &str = "gender";
/// Canonical name of the gender column in the correlation pipeline
pub const SEX: &str = "sex";
/// Height in centimeters
pub const HEIGHT: &str = "height";
/// Weight in kilograms
pub const WEIGHT: &str = "weight";
/// Systolic blood pressure
pub const AP_HI: &str = "ap_hi";
/// Diastolic blood pressure
pub const AP_LO: &str = "ap_lo";
pub const CHOLESTEROL: &str = "cholesterol";
pub const GLUC: &str = "gluc";
pub const SMOKE: &str = "smoke";
pub const ALCO: &str = "alco";
pub const ACTIVE: &str = "active";
pub const CARDIO: &str = "cardio";
pub const OVERWEIGHT: &str = "overweight";

/// Columns an input file must provide
pub const RAW_COLUMNS: [&str; 13] = [
    ID,
    AGE,
    GENDER,
    HEIGHT,
    WEIGHT,
    AP_HI,
    AP_LO,
    CHOLESTEROL,
    GLUC,
    SMOKE,
    ALCO,
    ACTIVE,
    CARDIO,
];

/// Binary indicators broken down by the categorical aggregator, in display order
pub const INDICATORS: [&str; 6] = [CHOLESTEROL, GLUC, SMOKE, ALCO, ACTIVE, OVERWEIGHT];

/// Look up a column, mapping absence to [`PipelineError::Schema`].
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| PipelineError::Schema {
        column: name.to_string(),
        available: column_names(df),
    })
}

/// Check that every listed column is present.
pub fn require_columns(df: &DataFrame, names: &[&str]) -> Result<()> {
    for name in names {
        require_column(df, name)?;
    }
    Ok(())
}

/// Whether a dtype can take part in numeric computation (numbers and booleans).
pub fn is_numeric_like(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric() || dtype.is_bool()
}

/// Read a column as `f64` values, keeping nulls.
///
/// Booleans coerce to 0.0/1.0. Any other non-numeric dtype is a
/// [`PipelineError::Type`]; strings are never parsed.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = require_column(df, name)?;
    column_as_f64(column)
}

/// Convert an already-resolved column to `f64` values.
pub fn column_as_f64(column: &Column) -> Result<Vec<Option<f64>>> {
    if !is_numeric_like(column.dtype()) {
        return Err(PipelineError::Type {
            column: column.name().to_string(),
            dtype: column.dtype().to_string(),
        });
    }

    let float_col = column.cast(&DataType::Float64)?;
    Ok(float_col.f64()?.into_iter().collect())
}

pub(crate) fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}
