//! Outlier removal ahead of the correlation heatmap
//!
//! A patient row is kept only if its blood pressure readings are consistent
//! (`ap_lo <= ap_hi`) and both height and weight fall inside the configured
//! percentile range of the input columns.

use polars::prelude::*;
use serde::Serialize;

use super::error::{PipelineError, Result};
use super::schema::{numeric_values, require_columns, AP_HI, AP_LO, GENDER, HEIGHT, SEX, WEIGHT};

/// Default lower percentile for height and weight
pub const DEFAULT_LOWER_QUANTILE: f64 = 0.025;

/// Default upper percentile for height and weight
pub const DEFAULT_UPPER_QUANTILE: f64 = 0.975;

/// Percentile range applied to height and weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierConfig {
    pub lower_quantile: f64,
    pub upper_quantile: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            lower_quantile: DEFAULT_LOWER_QUANTILE,
            upper_quantile: DEFAULT_UPPER_QUANTILE,
        }
    }
}

impl OutlierConfig {
    fn validate(&self) -> Result<()> {
        let in_unit = |q: f64| (0.0..=1.0).contains(&q);
        if in_unit(self.lower_quantile)
            && in_unit(self.upper_quantile)
            && self.lower_quantile <= self.upper_quantile
        {
            Ok(())
        } else {
            Err(PipelineError::InvalidQuantiles {
                lower: self.lower_quantile,
                upper: self.upper_quantile,
            })
        }
    }
}

/// Inclusive value range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

impl ValueRange {
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Percentile bounds computed from the unfiltered input.
///
/// `None` when the column has no non-null values; no row passes in that case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileBounds {
    pub height: Option<ValueRange>,
    pub weight: Option<ValueRange>,
}

/// Output of [`filter_outliers`]
#[derive(Debug, Clone)]
pub struct OutlierFilterResult {
    /// Surviving rows, with `gender` renamed to `sex`
    pub data: DataFrame,
    pub bounds: PercentileBounds,
    pub rows_before: usize,
    pub rows_removed: usize,
}

impl OutlierFilterResult {
    pub fn rows_kept(&self) -> usize {
        self.data.height()
    }

    /// True when every row was filtered out.
    ///
    /// This is a valid result, not an error; callers should show a placeholder.
    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }
}

/// Quantile by linear interpolation between closest ranks.
///
/// With the values sorted ascending and `h = (n - 1) * q`, the result is
/// `v[floor(h)] + (h - floor(h)) * (v[ceil(h)] - v[floor(h)])`. This is the
/// default convention of numpy and pandas. NaN values are ignored.
///
/// Returns `None` for an empty slice or `q` outside `0.0..=1.0`.
pub fn quantile_linear(values: &[f64], q: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&q) {
        return None;
    }

    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let h = (sorted.len() - 1) as f64 * q;
    let lower = h.floor() as usize;
    let upper = h.ceil() as usize;
    let fraction = h - lower as f64;

    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

/// Remove physiologically inconsistent and extreme rows.
///
/// Percentile bounds are computed once from the full input columns. A row is
/// retained iff `ap_lo <= ap_hi` and height and weight both lie inside their
/// inclusive bounds; a null in any compared column drops the row. The returned
/// frame is a fresh copy with `gender` renamed to `sex`.
///
/// # Errors
/// * `Schema` if `ap_lo`, `ap_hi`, `height`, `weight` or `gender` is missing
/// * `Type` if one of the compared columns is not numeric
/// * `InvalidQuantiles` if the configured percentiles are out of range
pub fn filter_outliers(df: &DataFrame, config: &OutlierConfig) -> Result<OutlierFilterResult> {
    config.validate()?;
    require_columns(df, &[AP_LO, AP_HI, HEIGHT, WEIGHT, GENDER])?;

    let ap_lo = numeric_values(df, AP_LO)?;
    let ap_hi = numeric_values(df, AP_HI)?;
    let heights = numeric_values(df, HEIGHT)?;
    let weights = numeric_values(df, WEIGHT)?;

    let bounds = PercentileBounds {
        height: percentile_range(&heights, config),
        weight: percentile_range(&weights, config),
    };

    let within = |range: Option<ValueRange>, value: Option<f64>| match (range, value) {
        (Some(range), Some(v)) => range.contains(v),
        _ => false,
    };

    let retain: Vec<bool> = (0..df.height())
        .map(|i| {
            let pressure_ok = matches!((ap_lo[i], ap_hi[i]), (Some(lo), Some(hi)) if lo <= hi);
            pressure_ok && within(bounds.height, heights[i]) && within(bounds.weight, weights[i])
        })
        .collect();

    let mask = BooleanChunked::new("retain".into(), retain);
    let mut data = df.filter(&mask)?;
    data.rename(GENDER, SEX.into())?;

    let rows_before = df.height();
    let rows_removed = rows_before - data.height();

    Ok(OutlierFilterResult {
        data,
        bounds,
        rows_before,
        rows_removed,
    })
}

fn percentile_range(values: &[Option<f64>], config: &OutlierConfig) -> Option<ValueRange> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    Some(ValueRange {
        low: quantile_linear(&present, config.lower_quantile)?,
        high: quantile_linear(&present, config.upper_quantile)?,
    })
}
