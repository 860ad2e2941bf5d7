//! Terminal renderings of the chart artifacts

use std::collections::BTreeSet;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use polars::prelude::*;

use crate::pipeline::schema::INDICATORS;
use crate::pipeline::{CorrelationHeatmap, HeatmapStyle, IndicatorCount, Result};

/// Rows shown in the cohort data preview by default
pub const DEFAULT_PREVIEW_ROWS: usize = 50;

/// Pivot the long-form counts into one row per indicator and one column per
/// `(cardio, value)` combination.
pub fn indicator_table(counts: &[IndicatorCount]) -> Table {
    let keys: BTreeSet<(i64, i64)> = counts.iter().map(|c| (c.cardio, c.value)).collect();

    let mut variables: Vec<&str> = INDICATORS
        .iter()
        .copied()
        .filter(|name| counts.iter().any(|c| c.variable == *name))
        .collect();
    for count in counts {
        if !variables.contains(&count.variable.as_str()) {
            variables.push(&count.variable);
        }
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);

    let mut header = vec![Cell::new("Indicator").add_attribute(Attribute::Bold)];
    header.extend(keys.iter().map(|(cardio, value)| {
        Cell::new(format!("cardio={} value={}", cardio, value)).add_attribute(Attribute::Bold)
    }));
    table.set_header(header);

    for variable in variables {
        let mut row = vec![Cell::new(variable)];
        row.extend(keys.iter().map(|(cardio, value)| {
            let total = counts
                .iter()
                .find(|c| c.cardio == *cardio && c.variable == variable && c.value == *value)
                .map(|c| c.total);
            match total {
                Some(total) => Cell::new(total).set_alignment(CellAlignment::Right),
                None => Cell::new("-").fg(Color::DarkGrey),
            }
        }));
        table.add_row(row);
    }

    table
}

/// Lower-triangular heatmap: suppressed cells are left blank and visible
/// cells are annotated with one decimal and coloured around `style.center`.
pub fn heatmap_table(heatmap: &CorrelationHeatmap, style: &HeatmapStyle) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);

    let mut header = vec![Cell::new("")];
    header.extend(
        heatmap
            .columns
            .iter()
            .map(|name| Cell::new(name).add_attribute(Attribute::Bold)),
    );
    table.set_header(header);

    for (i, name) in heatmap.columns.iter().enumerate() {
        let mut row = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        for j in 0..heatmap.size() {
            if heatmap.is_suppressed(i, j) {
                row.push(Cell::new(""));
                continue;
            }
            let value = heatmap.get(i, j);
            let cell = if value.is_nan() {
                Cell::new("nan").fg(Color::DarkGrey)
            } else {
                Cell::new(format!("{:.1}", value)).fg(heat_color(value, style))
            };
            row.push(cell.set_alignment(CellAlignment::Right));
        }
        table.add_row(row);
    }

    table
}

fn heat_color(value: f64, style: &HeatmapStyle) -> Color {
    if value >= style.vmax {
        Color::Red
    } else if value > style.center {
        Color::Yellow
    } else if value <= style.vmin {
        Color::Blue
    } else if value < style.center {
        Color::Cyan
    } else {
        Color::White
    }
}

/// First `max_rows` records of a frame, one table column per frame column.
///
/// Nulls render as empty cells.
pub fn preview_table(df: &DataFrame, max_rows: usize) -> Result<Table> {
    let head = df.head(Some(max_rows));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        head.get_column_names()
            .iter()
            .map(|name| Cell::new(name.as_str()).add_attribute(Attribute::Bold)),
    );

    for row_idx in 0..head.height() {
        let mut row = Vec::with_capacity(head.width());
        for column in head.get_columns() {
            let cell = match column.get(row_idx)? {
                AnyValue::Null => Cell::new(""),
                AnyValue::String(s) => Cell::new(s),
                value => Cell::new(value.to_string()).set_alignment(CellAlignment::Right),
            };
            row.push(cell);
        }
        table.add_row(row);
    }

    Ok(table)
}

/// Print a table indented to line up with the step output
pub fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::suppression_mask;
    use faer::Mat;

    #[test]
    fn test_heatmap_table_hides_upper_triangle() {
        let mut matrix = Mat::<f64>::zeros(2, 2);
        matrix[(0, 0)] = 1.0;
        matrix[(1, 1)] = 1.0;
        matrix[(0, 1)] = 0.7;
        matrix[(1, 0)] = 0.7;
        let heatmap = CorrelationHeatmap {
            columns: vec!["a".to_string(), "b".to_string()],
            matrix,
            mask: suppression_mask(2),
        };

        let rendered = heatmap_table(&heatmap, &HeatmapStyle::default()).to_string();
        assert!(rendered.contains("0.7"));
        assert!(!rendered.contains("1.0"), "diagonal must be hidden");
    }

    #[test]
    fn test_indicator_table_marks_missing_groups() {
        let counts = vec![
            IndicatorCount { cardio: 0, variable: "smoke".to_string(), value: 1, total: 1 },
            IndicatorCount { cardio: 1, variable: "smoke".to_string(), value: 0, total: 1 },
            IndicatorCount { cardio: 0, variable: "alco".to_string(), value: 0, total: 1 },
        ];

        let rendered = indicator_table(&counts).to_string();
        assert!(rendered.contains("cardio=0 value=0"));
        assert!(rendered.contains("cardio=1 value=0"));
        assert!(rendered.contains("smoke"));
        // smoke has no (cardio=0, value=0) group
        assert!(rendered.contains('-'));
        // fixed indicator order puts smoke before alco
        assert!(rendered.find("smoke").unwrap() < rendered.find("alco").unwrap());
    }

    #[test]
    fn test_preview_table_caps_rows() {
        let df = df! {
            "id" => (1..=60i64).collect::<Vec<_>>(),
            "weight" => (1..=60).map(|w| Some(w as f64)).collect::<Vec<_>>(),
        }
        .unwrap();

        let table = preview_table(&df, DEFAULT_PREVIEW_ROWS).unwrap();
        assert_eq!(table.row_iter().count(), 50);

        let rendered = table.to_string();
        assert!(rendered.contains("weight"));
        assert!(rendered.contains("50"));
        assert!(!rendered.contains("51"));
    }

    #[test]
    fn test_preview_table_null_cells_are_blank() {
        let df = df! { "ap_hi" => [Some(120i64), None] }.unwrap();
        let table = preview_table(&df, 10).unwrap();
        assert_eq!(table.row_iter().count(), 2);
        assert!(table.to_string().contains("120"));
        assert!(!table.to_string().contains("null"));
    }

    #[test]
    fn test_heat_color_bands() {
        let style = HeatmapStyle::default();
        assert_eq!(heat_color(0.3, &style), Color::Red);
        assert_eq!(heat_color(0.1, &style), Color::Yellow);
        assert_eq!(heat_color(0.0, &style), Color::White);
        assert_eq!(heat_color(-0.2, &style), Color::Blue);
    }
}
