//! Derived indicator columns
//!
//! Turns the raw examination table into the working dataset used by both analysis
//! pipelines: `overweight` is added from body-mass index, and the ordinal
//! `cholesterol`/`gluc` levels collapse to normal (0) vs above normal (1).

use polars::prelude::*;

use super::error::Result;
use super::schema::{numeric_values, require_columns, CHOLESTEROL, GLUC, HEIGHT, OVERWEIGHT, WEIGHT};

/// BMI strictly above this value marks a patient as overweight
pub const BMI_OVERWEIGHT_THRESHOLD: f64 = 25.0;

/// Ordinal levels strictly above this value count as "above normal"
const NORMAL_LEVEL: f64 = 1.0;

/// Body-mass index from weight in kilograms and height in centimeters.
///
/// No rounding is applied.
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// The working dataset: raw records with `overweight` added and
/// `cholesterol`/`gluc` collapsed to 0/1.
///
/// Only [`derive_features`] constructs it, so holding one means the indicators
/// are binary. Derefs to the underlying [`DataFrame`].
#[derive(Debug, Clone)]
pub struct DerivedDataset(DataFrame);

impl DerivedDataset {
    pub fn into_inner(self) -> DataFrame {
        self.0
    }
}

impl std::ops::Deref for DerivedDataset {
    type Target = DataFrame;

    fn deref(&self) -> &DataFrame {
        &self.0
    }
}

impl AsRef<DataFrame> for DerivedDataset {
    fn as_ref(&self) -> &DataFrame {
        &self.0
    }
}

/// Input accepted by [`derive_features`]
pub trait FeatureSource {
    fn derive(&self) -> Result<DerivedDataset>;
}

/// A plain frame is always treated as raw records.
impl FeatureSource for DataFrame {
    fn derive(&self) -> Result<DerivedDataset> {
        derive_from_raw(self)
    }
}

/// Deriving an already derived dataset returns it unchanged.
impl FeatureSource for DerivedDataset {
    fn derive(&self) -> Result<DerivedDataset> {
        Ok(self.clone())
    }
}

/// Produce the derived dataset.
///
/// Returns a new dataset; the input is left untouched. Row count and all other
/// columns are preserved. Null measurements never satisfy a threshold, so they
/// yield 0 in the derived columns.
///
/// A raw [`DataFrame`] is always binarized, and any `overweight` column it
/// already carries is overwritten. Passing a [`DerivedDataset`] is a no-op,
/// which makes the function idempotent on its own output.
///
/// # Errors
/// * `Schema` if `height`, `weight`, `cholesterol` or `gluc` is missing
/// * `Type` if any of those columns is not numeric
pub fn derive_features<S: FeatureSource + ?Sized>(source: &S) -> Result<DerivedDataset> {
    source.derive()
}

fn derive_from_raw(df: &DataFrame) -> Result<DerivedDataset> {
    require_columns(df, &[HEIGHT, WEIGHT, CHOLESTEROL, GLUC])?;

    let heights = numeric_values(df, HEIGHT)?;
    let weights = numeric_values(df, WEIGHT)?;
    let overweight: Vec<i64> = heights
        .iter()
        .zip(weights.iter())
        .map(|(height, weight)| match (height, weight) {
            (Some(h), Some(w)) => flag(body_mass_index(*w, *h) > BMI_OVERWEIGHT_THRESHOLD),
            _ => 0,
        })
        .collect();

    let cholesterol = binarize_level(df, CHOLESTEROL)?;
    let gluc = binarize_level(df, GLUC)?;

    let mut derived = df.clone();
    derived.with_column(Column::new(CHOLESTEROL.into(), cholesterol))?;
    derived.with_column(Column::new(GLUC.into(), gluc))?;
    derived.with_column(Column::new(OVERWEIGHT.into(), overweight))?;

    Ok(DerivedDataset(derived))
}

/// Collapse an ordinal 1-3 level into 0 (normal) / 1 (above normal).
fn binarize_level(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    Ok(numeric_values(df, name)?
        .into_iter()
        .map(|level| flag(level.is_some_and(|v| v > NORMAL_LEVEL)))
        .collect())
}

fn flag(condition: bool) -> i64 {
    if condition {
        1
    } else {
        0
    }
}
