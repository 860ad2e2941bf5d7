//! JSON export of the chart artifacts for an external renderer

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    CorrelationHeatmap, HeatmapStyle, IndicatorCount, OutlierConfig, OutlierFilterResult,
    PercentileBounds,
};

/// Metadata about the run that produced an artifact
#[derive(Debug, Serialize)]
pub struct ArtifactMetadata {
    /// Timestamp of the export (ISO 8601 format)
    pub timestamp: String,
    /// cardioviz version
    pub cardioviz_version: String,
    /// Input file path
    pub input_file: String,
    /// Patients in the derived dataset
    pub patients: usize,
}

impl ArtifactMetadata {
    pub fn new(input_file: &Path, patients: usize) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            cardioviz_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.display().to_string(),
            patients,
        }
    }
}

/// Grouped bar chart layout: bars of `total` per `variable`, coloured by
/// `value`, one panel per `cardio` label
#[derive(Debug, Serialize)]
pub struct CatplotLayout {
    pub x: &'static str,
    pub y: &'static str,
    pub hue: &'static str,
    pub col: &'static str,
    pub kind: &'static str,
}

impl Default for CatplotLayout {
    fn default() -> Self {
        Self {
            x: "variable",
            y: "total",
            hue: "value",
            col: "cardio",
            kind: "bar",
        }
    }
}

/// Categorical chart artifact
#[derive(Debug, Serialize)]
pub struct CatplotExport<'a> {
    pub metadata: ArtifactMetadata,
    pub layout: CatplotLayout,
    pub rows: &'a [IndicatorCount],
}

/// Outlier filter details recorded with the heatmap
#[derive(Debug, Serialize)]
pub struct FilterDetails {
    pub config: OutlierConfig,
    pub bounds: PercentileBounds,
    pub rows_before: usize,
    pub rows_kept: usize,
}

/// Heatmap artifact. Undefined correlations serialize as `null`.
#[derive(Debug, Serialize)]
pub struct HeatmapExport {
    pub metadata: ArtifactMetadata,
    pub style: HeatmapStyle,
    pub filter: FilterDetails,
    pub columns: Vec<String>,
    pub matrix: Vec<Vec<Option<f64>>>,
    pub mask: Vec<Vec<bool>>,
}

impl HeatmapExport {
    pub fn new(
        metadata: ArtifactMetadata,
        heatmap: &CorrelationHeatmap,
        filtered: &OutlierFilterResult,
        config: OutlierConfig,
    ) -> Self {
        let matrix = heatmap
            .rows()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|v| if v.is_nan() { None } else { Some(v) })
                    .collect()
            })
            .collect();

        Self {
            metadata,
            style: HeatmapStyle::default(),
            filter: FilterDetails {
                config,
                bounds: filtered.bounds,
                rows_before: filtered.rows_before,
                rows_kept: filtered.rows_kept(),
            },
            columns: heatmap.columns.clone(),
            matrix,
            mask: heatmap.mask.clone(),
        }
    }
}

/// Write the categorical chart artifact to `output_path`
pub fn export_catplot(
    rows: &[IndicatorCount],
    metadata: ArtifactMetadata,
    output_path: &Path,
) -> Result<()> {
    let export = CatplotExport {
        metadata,
        layout: CatplotLayout::default(),
        rows,
    };
    write_json(&export, output_path, "categorical chart")
}

/// Write the heatmap artifact to `output_path`
pub fn export_heatmap(export: &HeatmapExport, output_path: &Path) -> Result<()> {
    write_json(export, output_path, "heatmap")
}

fn write_json<T: Serialize>(value: &T, output_path: &Path, what: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {} to JSON", what))?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write {} to {}", what, output_path.display()))?;

    Ok(())
}
