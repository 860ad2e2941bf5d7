//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::pipeline::{CholesterolFilter, CohortFilter, FlagFilter, OutlierConfig};
use crate::report::DEFAULT_PREVIEW_ROWS;

/// File name of the exported categorical chart artifact
pub const CATPLOT_FILE: &str = "catplot.json";

/// File name of the exported heatmap artifact
pub const HEATMAP_FILE: &str = "heatmap.json";

/// Which chart artifacts to produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlotKind {
    Categorical,
    Heatmap,
    #[default]
    Both,
}

impl PlotKind {
    pub fn includes_categorical(&self) -> bool {
        matches!(self, PlotKind::Categorical | PlotKind::Both)
    }

    pub fn includes_heatmap(&self) -> bool {
        matches!(self, PlotKind::Heatmap | PlotKind::Both)
    }
}

impl std::fmt::Display for PlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlotKind::Categorical => write!(f, "categorical"),
            PlotKind::Heatmap => write!(f, "heatmap"),
            PlotKind::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for PlotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "categorical" | "cat" => Ok(PlotKind::Categorical),
            "heatmap" | "heat" => Ok(PlotKind::Heatmap),
            "both" => Ok(PlotKind::Both),
            _ => Err(format!(
                "Unknown plot: '{}'. Use 'categorical', 'heatmap' or 'both'.",
                s
            )),
        }
    }
}

/// cardioviz - Categorical breakdowns and correlation heatmaps for medical examination data
#[derive(Parser, Debug)]
#[command(name = "cardioviz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet) with the medical examination records
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory for exported chart artifacts.
    /// Defaults to the directory of the input file.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Chart to generate: "categorical", "heatmap" or "both"
    #[arg(short, long, default_value = "both")]
    pub plot: PlotKind,

    /// Lower percentile for height and weight outlier removal (0.0 to 1.0)
    #[arg(long, default_value = "0.025", value_parser = validate_quantile)]
    pub lower_quantile: f64,

    /// Upper percentile for height and weight outlier removal (0.0 to 1.0)
    #[arg(long, default_value = "0.975", value_parser = validate_quantile)]
    pub upper_quantile: f64,

    /// Minimum patient age in years for the cohort summary
    #[arg(long, default_value = "30")]
    pub age_min: f64,

    /// Maximum patient age in years for the cohort summary
    #[arg(long, default_value = "60")]
    pub age_max: f64,

    /// Smoker status for the cohort summary: "all", "yes" or "no"
    #[arg(long, default_value = "all")]
    pub smoker: FlagFilter,

    /// Alcohol intake for the cohort summary: "all", "yes" or "no"
    #[arg(long, default_value = "all")]
    pub alcohol: FlagFilter,

    /// Physical activity for the cohort summary: "all", "yes" or "no"
    #[arg(long, default_value = "all")]
    pub activity: FlagFilter,

    /// Raw cholesterol level for the cohort summary.
    /// Options: "all", "normal", "above-normal", "well-above-normal"
    #[arg(long, default_value = "all")]
    pub cholesterol: CholesterolFilter,

    /// Number of cohort records to preview in the terminal (0 disables the preview)
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub preview_rows: usize,

    /// Skip writing the JSON chart artifacts
    #[arg(long, default_value = "false")]
    pub no_export: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Output directory, falling back to the input file's directory.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            self.input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf()
        })
    }

    pub fn catplot_path(&self) -> PathBuf {
        self.output_dir().join(CATPLOT_FILE)
    }

    pub fn heatmap_path(&self) -> PathBuf {
        self.output_dir().join(HEATMAP_FILE)
    }

    pub fn outlier_config(&self) -> OutlierConfig {
        OutlierConfig {
            lower_quantile: self.lower_quantile,
            upper_quantile: self.upper_quantile,
        }
    }

    pub fn cohort_filter(&self) -> CohortFilter {
        CohortFilter {
            min_age_years: self.age_min,
            max_age_years: self.age_max,
            smoker: self.smoker,
            alcohol: self.alcohol,
            active: self.activity,
            cholesterol: self.cholesterol,
        }
    }
}

/// Validator for percentile parameters
fn validate_quantile(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!("quantile must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}
