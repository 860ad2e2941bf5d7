//! Run summary and cohort report

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{CohortFilter, CohortSummary};

/// Summary of a cardioviz run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub patients: usize,
    pub aggregate_rows: Option<usize>,
    pub rows_after_filter: Option<usize>,
    pub correlated_columns: Option<usize>,
    pub exported: Vec<String>,
    pub load_time: Duration,
    pub categorical_time: Duration,
    pub heatmap_time: Duration,
}

impl RunSummary {
    pub fn new(patients: usize) -> Self {
        Self {
            patients,
            ..Default::default()
        }
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = elapsed;
    }

    pub fn record_categorical(&mut self, rows: usize, elapsed: Duration) {
        self.aggregate_rows = Some(rows);
        self.categorical_time = elapsed;
    }

    pub fn record_heatmap(&mut self, rows_kept: usize, columns: usize, elapsed: Duration) {
        self.rows_after_filter = Some(rows_kept);
        self.correlated_columns = Some(columns);
        self.heatmap_time = elapsed;
    }

    pub fn add_export(&mut self, path: String) {
        self.exported.push(path);
    }

    /// Share of patients removed by the outlier filter, in percent
    pub fn outlier_pct(&self) -> Option<f64> {
        let kept = self.rows_after_filter?;
        if self.patients == 0 {
            return Some(0.0);
        }
        Some((self.patients - kept) as f64 / self.patients as f64 * 100.0)
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("🩺 Patients"),
            Cell::new(self.patients),
        ]);

        if let Some(rows) = self.aggregate_rows {
            table.add_row(vec![Cell::new("📊 Aggregate Rows"), Cell::new(rows)]);
        }

        if let (Some(kept), Some(pct)) = (self.rows_after_filter, self.outlier_pct()) {
            table.add_row(vec![
                Cell::new("🧹 Rows After Outlier Filter"),
                Cell::new(kept).fg(if kept == 0 { Color::Red } else { Color::Green }),
            ]);
            table.add_row(vec![
                Cell::new("📉 Removed"),
                Cell::new(format!("{:.1}%", pct)).fg(Color::Yellow),
            ]);
        }

        if let Some(columns) = self.correlated_columns {
            table.add_row(vec![Cell::new("🔥 Heatmap Columns"), Cell::new(columns)]);
        }

        table.add_row(vec![
            Cell::new("⏱️  Total Time"),
            Cell::new(format!(
                "{:.2}s",
                (self.load_time + self.categorical_time + self.heatmap_time).as_secs_f64()
            )),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.exported.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("💾").cyan(),
                style("EXPORTED ARTIFACTS").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for path in &self.exported {
                println!("        {} {}", style("•").dim(), path);
            }
        }
    }
}

/// Print the cohort summary paragraph
pub fn display_cohort(filter: &CohortFilter, summary: &CohortSummary) {
    println!(
        "      Cohort: ages {}-{}, smoker {}, alcohol {}, active {}, cholesterol {}",
        filter.min_age_years,
        filter.max_age_years,
        filter.smoker,
        filter.alcohol,
        filter.active,
        filter.cholesterol
    );
    println!(
        "      Patients: {}",
        style(summary.patients).yellow().bold()
    );

    let fmt = |value: Option<f64>, precision: usize, unit: &str| match value {
        Some(v) => format!("{:.*}{}", precision, v, unit),
        None => "n/a".to_string(),
    };

    println!("      Avg. systolic BP:  {}", fmt(summary.avg_systolic, 1, " mmHg"));
    println!("      Avg. diastolic BP: {}", fmt(summary.avg_diastolic, 1, " mmHg"));
    println!("      Avg. weight:       {}", fmt(summary.avg_weight, 1, " kg"));
    println!(
        "      Avg. cholesterol:  {} {}",
        fmt(summary.avg_cholesterol, 2, ""),
        style("(1 = normal, 2 = above normal, 3 = well above normal)").dim()
    );
}
