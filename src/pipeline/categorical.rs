//! Categorical breakdown of the binary indicators by cardio label
//!
//! The derived dataset is reshaped to long form, one `(cardio, variable, value)`
//! tuple per patient and indicator, and the tuples are counted per distinct
//! triple. The resulting rows feed a grouped bar chart split by `cardio`.

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::Serialize;

use super::error::{PipelineError, Result};
use super::schema::{numeric_values, require_columns, CARDIO, INDICATORS};

/// One tuple of the long-form reshape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongRow {
    pub cardio: Option<i64>,
    pub variable: &'static str,
    pub value: Option<i64>,
}

/// Number of patients sharing a `(cardio, variable, value)` combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorCount {
    pub cardio: i64,
    pub variable: String,
    pub value: i64,
    pub total: u64,
}

/// Reshape the indicator columns to long form.
///
/// Emits `6 * df.height()` rows: for each patient, one row per indicator in the
/// fixed order of [`INDICATORS`], carrying that patient's cardio label. Indicator
/// values and labels must be integral category codes; nulls are kept as `None`.
///
/// # Errors
/// * `NonIntegral` if a label or indicator value has a fractional part
pub fn reshape_long(df: &DataFrame) -> Result<Vec<LongRow>> {
    require_columns(df, &[CARDIO])?;
    require_columns(df, &INDICATORS)?;

    let cardio = category_codes(df, CARDIO)?;
    let indicator_values = INDICATORS
        .iter()
        .map(|name| category_codes(df, name))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::with_capacity(df.height() * INDICATORS.len());
    for (row_idx, label) in cardio.iter().enumerate() {
        for (variable, values) in INDICATORS.iter().zip(indicator_values.iter()) {
            rows.push(LongRow {
                cardio: *label,
                variable: *variable,
                value: values[row_idx],
            });
        }
    }

    Ok(rows)
}

/// Count long-form rows per distinct `(cardio, variable, value)`.
///
/// Rows with a null cardio label or value are not counted. Output is ordered by
/// cardio, then the fixed indicator order, then value.
pub fn count_groups(rows: &[LongRow]) -> Vec<IndicatorCount> {
    let mut counts: BTreeMap<(i64, usize, &'static str, i64), u64> = BTreeMap::new();

    for row in rows {
        if let (Some(cardio), Some(value)) = (row.cardio, row.value) {
            *counts
                .entry((cardio, indicator_rank(row.variable), row.variable, value))
                .or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|((cardio, _, variable, value), total)| IndicatorCount {
            cardio,
            variable: variable.to_string(),
            value,
            total,
        })
        .collect()
}

/// Long-form aggregate of the six indicators split by cardio label.
///
/// # Errors
/// * `Schema` if `cardio` or any indicator column is missing
/// * `Type` if one of them is not numeric
/// * `NonIntegral` if one of them holds a fractional value
///
/// An empty frame yields an empty collection.
pub fn aggregate_indicators(df: &DataFrame) -> Result<Vec<IndicatorCount>> {
    let long = reshape_long(df)?;
    Ok(count_groups(&long))
}

/// Build the `{cardio, variable, value, total}` frame expected by the bar chart renderer.
pub fn indicator_counts_frame(counts: &[IndicatorCount]) -> Result<DataFrame> {
    let cardio: Vec<i64> = counts.iter().map(|c| c.cardio).collect();
    let variable: Vec<&str> = counts.iter().map(|c| c.variable.as_str()).collect();
    let value: Vec<i64> = counts.iter().map(|c| c.value).collect();
    let total: Vec<u64> = counts.iter().map(|c| c.total).collect();

    let df = DataFrame::new(vec![
        Column::new(CARDIO.into(), cardio),
        Column::new("variable".into(), variable),
        Column::new("value".into(), value),
        Column::new("total".into(), total),
    ])?;

    Ok(df)
}

/// Read a column of category codes, rejecting values with a fractional part.
fn category_codes(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    numeric_values(df, name)?
        .into_iter()
        .map(|value| match value {
            Some(v) if v.fract() != 0.0 => Err(PipelineError::NonIntegral {
                column: name.to_string(),
                value: v,
            }),
            other => Ok(other.map(|v| v as i64)),
        })
        .collect()
}

/// Position in [`INDICATORS`]; unknown names sort last
fn indicator_rank(variable: &str) -> usize {
    INDICATORS
        .iter()
        .position(|name| *name == variable)
        .unwrap_or(INDICATORS.len())
}
