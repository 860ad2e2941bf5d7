//! Patient cohort selection and summary vitals
//!
//! Filters operate on the raw examination table, so the cholesterol filter uses
//! the original 1/2/3 levels. The selected cohort is only summarized; both
//! charts are always drawn from the full dataset.

use polars::prelude::*;
use serde::Serialize;

use super::error::Result;
use super::schema::{numeric_values, ACTIVE, AGE, ALCO, AP_HI, AP_LO, CHOLESTEROL, SMOKE, WEIGHT};

const DAYS_PER_YEAR: f64 = 365.0;

/// Default age selection in years
pub const DEFAULT_MIN_AGE_YEARS: f64 = 30.0;
pub const DEFAULT_MAX_AGE_YEARS: f64 = 60.0;

/// Tri-state filter on a binary lifestyle flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum FlagFilter {
    #[default]
    All,
    /// Flag set (value 1)
    Yes,
    /// Flag not set (value 0)
    No,
}

impl FlagFilter {
    fn accepts(&self, value: Option<f64>) -> bool {
        match self {
            FlagFilter::All => true,
            FlagFilter::Yes => value == Some(1.0),
            FlagFilter::No => value == Some(0.0),
        }
    }
}

impl std::fmt::Display for FlagFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagFilter::All => write!(f, "all"),
            FlagFilter::Yes => write!(f, "yes"),
            FlagFilter::No => write!(f, "no"),
        }
    }
}

impl std::str::FromStr for FlagFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(FlagFilter::All),
            "yes" => Ok(FlagFilter::Yes),
            "no" => Ok(FlagFilter::No),
            _ => Err(format!("Unknown flag filter: '{}'. Use 'all', 'yes' or 'no'.", s)),
        }
    }
}

/// Filter on the raw ordinal cholesterol level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum CholesterolFilter {
    #[default]
    All,
    Normal,
    AboveNormal,
    WellAboveNormal,
}

impl CholesterolFilter {
    fn level(&self) -> Option<f64> {
        match self {
            CholesterolFilter::All => None,
            CholesterolFilter::Normal => Some(1.0),
            CholesterolFilter::AboveNormal => Some(2.0),
            CholesterolFilter::WellAboveNormal => Some(3.0),
        }
    }

    fn accepts(&self, value: Option<f64>) -> bool {
        match self.level() {
            None => true,
            Some(level) => value == Some(level),
        }
    }
}

impl std::fmt::Display for CholesterolFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CholesterolFilter::All => write!(f, "all"),
            CholesterolFilter::Normal => write!(f, "normal"),
            CholesterolFilter::AboveNormal => write!(f, "above-normal"),
            CholesterolFilter::WellAboveNormal => write!(f, "well-above-normal"),
        }
    }
}

impl std::str::FromStr for CholesterolFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(CholesterolFilter::All),
            "normal" => Ok(CholesterolFilter::Normal),
            "above-normal" => Ok(CholesterolFilter::AboveNormal),
            "well-above-normal" => Ok(CholesterolFilter::WellAboveNormal),
            _ => Err(format!(
                "Unknown cholesterol filter: '{}'. Use 'all', 'normal', 'above-normal' or 'well-above-normal'.",
                s
            )),
        }
    }
}

/// Cohort selection criteria
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortFilter {
    /// Inclusive age bounds in years
    pub min_age_years: f64,
    pub max_age_years: f64,
    pub smoker: FlagFilter,
    pub alcohol: FlagFilter,
    pub active: FlagFilter,
    pub cholesterol: CholesterolFilter,
}

impl Default for CohortFilter {
    fn default() -> Self {
        Self {
            min_age_years: DEFAULT_MIN_AGE_YEARS,
            max_age_years: DEFAULT_MAX_AGE_YEARS,
            smoker: FlagFilter::All,
            alcohol: FlagFilter::All,
            active: FlagFilter::All,
            cholesterol: CholesterolFilter::All,
        }
    }
}

/// Average vitals of a cohort; means are `None` for an empty cohort
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummary {
    pub patients: usize,
    pub avg_systolic: Option<f64>,
    pub avg_diastolic: Option<f64>,
    pub avg_weight: Option<f64>,
    /// Mean of the raw 1-3 cholesterol level
    pub avg_cholesterol: Option<f64>,
}

/// Select the patients matching `filter` from the raw table.
///
/// Returns a new frame; rows with a null in a filtered column are excluded.
pub fn apply_cohort_filter(df: &DataFrame, filter: &CohortFilter) -> Result<DataFrame> {
    let ages = numeric_values(df, AGE)?;
    let smoke = numeric_values(df, SMOKE)?;
    let alco = numeric_values(df, ALCO)?;
    let active = numeric_values(df, ACTIVE)?;
    let cholesterol = numeric_values(df, CHOLESTEROL)?;

    let retain: Vec<bool> = (0..df.height())
        .map(|i| {
            let age_ok = ages[i].is_some_and(|days| {
                let years = days / DAYS_PER_YEAR;
                filter.min_age_years <= years && years <= filter.max_age_years
            });
            age_ok
                && filter.smoker.accepts(smoke[i])
                && filter.alcohol.accepts(alco[i])
                && filter.active.accepts(active[i])
                && filter.cholesterol.accepts(cholesterol[i])
        })
        .collect();

    let mask = BooleanChunked::new("cohort".into(), retain);
    Ok(df.filter(&mask)?)
}

/// Patient count and average vitals of a cohort.
pub fn summarize_cohort(df: &DataFrame) -> Result<CohortSummary> {
    Ok(CohortSummary {
        patients: df.height(),
        avg_systolic: mean(&numeric_values(df, AP_HI)?),
        avg_diastolic: mean(&numeric_values(df, AP_LO)?),
        avg_weight: mean(&numeric_values(df, WEIGHT)?),
        avg_cholesterol: mean(&numeric_values(df, CHOLESTEROL)?),
    })
}

fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}
