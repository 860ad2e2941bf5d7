//! cardioviz: Medical Examination Analysis CLI
//!
//! Loads medical examination records, derives the risk indicators, and produces
//! the categorical breakdown and the correlation heatmap.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use cardioviz::cli::Cli;
use cardioviz::pipeline::{
    aggregate_indicators, apply_cohort_filter, build_correlation, derive_features,
    estimated_memory_mb, filter_outliers, load_examination_data, summarize_cohort, HeatmapStyle,
};
use cardioviz::report::{
    display_cohort, export_catplot, export_heatmap, heatmap_table, indicator_table,
    preview_table, print_indented, ArtifactMetadata, HeatmapExport, RunSummary,
};
use cardioviz::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_info, print_step_header, print_step_time, print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let outlier_config = cli.outlier_config();
    let output_dir = cli.output_dir();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&cli.input, &output_dir, cli.plot, &outlier_config);

    // Step 1: Load and derive
    print_step_header(1, "Load Dataset");

    let step_start = Instant::now();
    let spinner = create_spinner("Loading examination records...");
    let raw = load_examination_data(&cli.input, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");

    let (rows, cols) = raw.shape();
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", estimated_memory_mb(&raw));

    let derived = derive_features(&raw)?;
    print_success("Derived overweight, cholesterol and gluc indicators");

    let mut summary = RunSummary::new(derived.height());
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Step 2: Cohort summary over the raw records
    print_step_header(2, "Cohort Summary");

    let cohort_filter = cli.cohort_filter();
    let cohort = apply_cohort_filter(&raw, &cohort_filter)?;
    let cohort_summary = summarize_cohort(&cohort)?;
    display_cohort(&cohort_filter, &cohort_summary);
    if cohort_summary.patients == 0 {
        print_warning("No patients match the cohort filters");
    } else if cli.preview_rows > 0 {
        println!();
        print_info(&format!(
            "Filtered records (first {} of {})",
            cli.preview_rows.min(cohort.height()),
            cohort.height()
        ));
        print_indented(&preview_table(&cohort, cli.preview_rows)?);
    }

    if !cli.no_export {
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory: {}", output_dir.display())
        })?;
    }

    // Step 3: Categorical breakdown
    if cli.plot.includes_categorical() {
        print_step_header(3, "Categorical Breakdown");

        let step_start = Instant::now();
        let spinner = create_spinner("Counting indicators by cardio label...");
        let counts = aggregate_indicators(&derived)?;
        finish_with_success(&spinner, "Indicator counts ready");

        if counts.is_empty() {
            print_info("No patients to aggregate");
        } else {
            println!();
            print_indented(&indicator_table(&counts));
        }

        if !cli.no_export {
            let path = cli.catplot_path();
            export_catplot(&counts, ArtifactMetadata::new(&cli.input, derived.height()), &path)?;
            print_success(&format!("Saved to {}", path.display()));
            summary.add_export(path.display().to_string());
        }

        let elapsed = step_start.elapsed();
        summary.record_categorical(counts.len(), elapsed);
        print_step_time(elapsed);
    }

    // Step 4: Correlation heatmap
    if cli.plot.includes_heatmap() {
        let step = if cli.plot.includes_categorical() { 4 } else { 3 };
        print_step_header(step, "Correlation Heatmap");

        let step_start = Instant::now();
        let spinner = create_spinner("Removing outliers...");
        let filtered = filter_outliers(&derived, &outlier_config)?;
        if filtered.is_empty() {
            finish_with_warning(&spinner, "No rows survived outlier filtering");
        } else {
            finish_with_success(
                &spinner,
                &format!(
                    "Kept {} of {} rows",
                    filtered.rows_kept(),
                    filtered.rows_before
                ),
            );
        }

        let spinner = create_spinner("Computing correlation matrix...");
        let heatmap = build_correlation(&filtered.data)?;
        finish_with_success(
            &spinner,
            &format!("Correlated {} columns", heatmap.size()),
        );

        let heatmap_style = HeatmapStyle::default();
        if filtered.is_empty() {
            print_warning("Heatmap is empty: every row was filtered out");
        } else {
            println!();
            print_indented(&heatmap_table(&heatmap, &heatmap_style));
        }

        if !cli.no_export {
            let path = cli.heatmap_path();
            let export = HeatmapExport::new(
                ArtifactMetadata::new(&cli.input, derived.height()),
                &heatmap,
                &filtered,
                outlier_config,
            );
            export_heatmap(&export, &path)?;
            print_success(&format!("Saved to {}", path.display()));
            summary.add_export(path.display().to_string());
        }

        let elapsed = step_start.elapsed();
        summary.record_heatmap(filtered.rows_kept(), heatmap.size(), elapsed);
        print_step_time(elapsed);
    }

    summary.display();
    print_completion();

    Ok(())
}
