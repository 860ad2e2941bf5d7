//! Correlation matrix and heatmap mask
//!
//! Computes pairwise Pearson correlation across every column of the filtered
//! dataset, rounds it for display, and marks the upper triangle (diagonal
//! included) as suppressed so each pair is drawn once.

use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::error::{PipelineError, Result};
use super::schema::column_as_f64;

/// Fixed rendering parameters for the heatmap
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapStyle {
    pub vmin: f64,
    pub vmax: f64,
    pub center: f64,
    /// printf-style format of the cell annotations
    pub annotation_format: &'static str,
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self {
            vmin: -0.1,
            vmax: 0.25,
            center: 0.0,
            annotation_format: ".1f",
        }
    }
}

/// Rounded correlation matrix with its suppression mask
#[derive(Debug, Clone)]
pub struct CorrelationHeatmap {
    /// Column labels, in the order of the filtered dataset
    pub columns: Vec<String>,
    /// Symmetric matrix rounded to one decimal; NaN where undefined
    pub matrix: Mat<f64>,
    /// `mask[i][j]` is true when the cell is hidden (`j >= i`)
    pub mask: Vec<Vec<bool>>,
}

impl CorrelationHeatmap {
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[(i, j)]
    }

    pub fn is_suppressed(&self, i: usize, j: usize) -> bool {
        self.mask[i][j]
    }

    /// Look up a cell by column names.
    pub fn get_by_name(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        Some(self.get(i, j))
    }

    /// Matrix as nested rows, for serialization.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.size())
            .map(|i| (0..self.size()).map(|j| self.get(i, j)).collect())
            .collect()
    }
}

/// Round to one decimal place, ties away from zero.
///
/// NaN passes through.
pub fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Upper-triangular suppression mask: true where `j >= i`.
pub fn suppression_mask(size: usize) -> Vec<Vec<bool>> {
    (0..size)
        .map(|i| (0..size).map(|j| j >= i).collect())
        .collect()
}

/// Pearson correlation over pairwise-complete observations.
///
/// Rows where either value is null or NaN are skipped. Uses a single-pass
/// Welford update for numerical stability. Returns NaN when no rows remain or
/// either side has zero variance.
pub fn pearson_correlation(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut m2_x = 0.0;
    let mut m2_y = 0.0;
    let mut co_moment = 0.0;

    for (x, y) in x.iter().zip(y.iter()) {
        let (Some(x), Some(y)) = (*x, *y) else {
            continue;
        };
        if x.is_nan() || y.is_nan() {
            continue;
        }

        n += 1.0;
        let dx = x - mean_x;
        let dy = y - mean_y;
        mean_x += dx / n;
        mean_y += dy / n;
        m2_x += dx * (x - mean_x);
        m2_y += dy * (y - mean_y);
        co_moment += dx * (y - mean_y);
    }

    if n == 0.0 {
        return f64::NAN;
    }

    let denominator = (m2_x * m2_y).sqrt();
    if denominator == 0.0 {
        return f64::NAN;
    }

    (co_moment / denominator).clamp(-1.0, 1.0)
}

/// Unrounded correlation matrix over every column of `df`.
///
/// Boolean columns count as 0/1. The diagonal is 1.0 for every column,
/// including constant ones; off-diagonal undefined correlations stay NaN.
///
/// # Errors
/// * `InsufficientColumns` when `df` has fewer than two columns
/// * `Type` when a column is neither numeric nor boolean
pub fn correlation_matrix(df: &DataFrame) -> Result<(Vec<String>, Mat<f64>)> {
    let num_cols = df.width();
    if num_cols < 2 {
        return Err(PipelineError::InsufficientColumns { found: num_cols });
    }

    let columns: Vec<(String, Vec<Option<f64>>)> = df
        .get_columns()
        .iter()
        .map(|col| Ok((col.name().to_string(), column_as_f64(col)?)))
        .collect::<Result<_>>()?;

    // Upper triangle only; mirrored below so the matrix is exactly symmetric
    let pairs: Vec<(usize, usize)> = (0..num_cols)
        .flat_map(|i| ((i + 1)..num_cols).map(move |j| (i, j)))
        .collect();

    let correlations: Vec<(usize, usize, f64)> = pairs
        .par_iter()
        .map(|&(i, j)| (i, j, pearson_correlation(&columns[i].1, &columns[j].1)))
        .collect();

    let mut matrix = Mat::<f64>::zeros(num_cols, num_cols);
    for i in 0..num_cols {
        matrix[(i, i)] = 1.0;
    }
    for (i, j, corr) in correlations {
        matrix[(i, j)] = corr;
        matrix[(j, i)] = corr;
    }

    let names = columns.into_iter().map(|(name, _)| name).collect();
    Ok((names, matrix))
}

/// Build the heatmap artifact from the filtered dataset.
///
/// Every cell is rounded with [`round_to_one_decimal`]. The mask is a rendering
/// instruction only and leaves the values untouched.
pub fn build_correlation(df: &DataFrame) -> Result<CorrelationHeatmap> {
    let (columns, raw) = correlation_matrix(df)?;
    let size = columns.len();

    let mut matrix = Mat::<f64>::zeros(size, size);
    for i in 0..size {
        for j in 0..size {
            matrix[(i, j)] = round_to_one_decimal(raw[(i, j)]);
        }
    }

    Ok(CorrelationHeatmap {
        columns,
        matrix,
        mask: suppression_mask(size),
    })
}
