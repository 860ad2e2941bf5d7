//! Tests for the correlation heatmap builder

use cardioviz::pipeline::{
    build_correlation, correlation_matrix, derive_features, filter_outliers, OutlierConfig,
    PipelineError,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn heatmap_for_random_patients(rows: usize, seed: u64) -> cardioviz::pipeline::CorrelationHeatmap {
    let derived = derive_features(&create_random_patients(rows, seed)).unwrap();
    let filtered = filter_outliers(&derived, &OutlierConfig::default()).unwrap();
    build_correlation(&filtered.data).unwrap()
}

#[test]
fn test_matrix_is_symmetric_with_unit_diagonal() {
    let heatmap = heatmap_for_random_patients(500, 1);
    let n = heatmap.size();

    for i in 0..n {
        assert_eq!(heatmap.get(i, i), 1.0, "diagonal at {}", i);
        for j in 0..n {
            let (a, b) = (heatmap.get(i, j), heatmap.get(j, i));
            assert!(a == b || (a.is_nan() && b.is_nan()), "asymmetric at ({}, {})", i, j);
        }
    }
}

#[test]
fn test_values_rounded_to_one_decimal_in_range() {
    let heatmap = heatmap_for_random_patients(500, 2);

    for row in heatmap.rows() {
        for value in row.into_iter().filter(|v| !v.is_nan()) {
            assert!((-1.0..=1.0).contains(&value));
            assert!(
                ((value * 10.0).round() - value * 10.0).abs() < 1e-9,
                "{} is not rounded to one decimal",
                value
            );
        }
    }
}

#[test]
fn test_mask_is_upper_triangle_with_diagonal() {
    let heatmap = heatmap_for_random_patients(200, 3);
    let n = heatmap.size();

    assert_eq!(heatmap.mask.len(), n);
    for i in 0..n {
        assert_eq!(heatmap.mask[i].len(), n);
        for j in 0..n {
            assert_eq!(heatmap.is_suppressed(i, j), j >= i, "mask at ({}, {})", i, j);
        }
    }
}

#[test]
fn test_columns_follow_filtered_dataset() {
    let derived = derive_features(&create_patient_dataframe()).unwrap();
    let filtered = filter_outliers(&derived, &OutlierConfig::default()).unwrap();
    let heatmap = build_correlation(&filtered.data).unwrap();

    assert_eq!(
        heatmap.columns,
        vec![
            "id", "age", "sex", "height", "weight", "ap_hi", "ap_lo", "cholesterol", "gluc",
            "smoke", "alco", "active", "cardio", "overweight",
        ]
    );
}

#[test]
fn test_known_correlations() {
    let df = df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "b" => [2.0f64, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0],
        "c" => [10.0f64, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0],
        "d" => [5.0f64, 1.0, 8.0, 2.0, 9.0, 3.0, 7.0, 4.0, 6.0, 0.0],
    }
    .unwrap();

    let heatmap = build_correlation(&df).unwrap();
    assert_eq!(heatmap.get_by_name("a", "b"), Some(1.0));
    assert_eq!(heatmap.get_by_name("a", "c"), Some(-1.0));

    // unrounded r(a, d) = -10.5 / 82.5, rounds to -0.1
    let (_, raw) = correlation_matrix(&df).unwrap();
    assert!((raw[(0, 3)] + 10.5 / 82.5).abs() < 1e-9, "got {}", raw[(0, 3)]);
    assert_eq!(heatmap.get_by_name("a", "d"), Some(-0.1));
}

#[test]
fn test_mask_does_not_alter_values() {
    let df = df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0],
        "b" => [1.0f64, 3.0, 2.0, 4.0],
    }
    .unwrap();

    let heatmap = build_correlation(&df).unwrap();
    // r = 0.8 in both triangles even though (0, 1) is suppressed
    assert_eq!(heatmap.get(0, 1), 0.8);
    assert_eq!(heatmap.get(1, 0), 0.8);
    assert!(heatmap.is_suppressed(0, 1));
    assert!(!heatmap.is_suppressed(1, 0));
}

#[test]
fn test_constant_column() {
    let df = df! {
        "constant" => [3.0f64, 3.0, 3.0, 3.0],
        "varying" => [1.0f64, 2.0, 3.0, 4.0],
    }
    .unwrap();

    let heatmap = build_correlation(&df).unwrap();
    assert_eq!(heatmap.get(0, 0), 1.0);
    assert!(heatmap.get(0, 1).is_nan());
    assert!(heatmap.get(1, 0).is_nan());
    assert_eq!(heatmap.get(1, 1), 1.0);
}

#[test]
fn test_boolean_columns_are_coerced() {
    let df = df! {
        "flag" => [true, false, true, false],
        "value" => [1i64, 0, 1, 0],
    }
    .unwrap();

    let heatmap = build_correlation(&df).unwrap();
    assert_eq!(heatmap.get_by_name("flag", "value"), Some(1.0));
}

#[test]
fn test_empty_filtered_dataset() {
    let df = df! {
        "a" => Vec::<f64>::new(),
        "b" => Vec::<f64>::new(),
    }
    .unwrap();

    let heatmap = build_correlation(&df).unwrap();
    assert_eq!(heatmap.get(0, 0), 1.0);
    assert!(heatmap.get(0, 1).is_nan());
}

#[test]
fn test_too_few_columns() {
    let df = df! { "only" => [1.0f64, 2.0] }.unwrap();
    assert!(matches!(
        build_correlation(&df),
        Err(PipelineError::InsufficientColumns { found: 1 })
    ));
}

#[test]
fn test_text_column_is_type_error() {
    let df = df! {
        "gender" => ["f", "m", "f"],
        "height" => [160i64, 180, 165],
    }
    .unwrap();

    let err = build_correlation(&df).unwrap_err();
    assert!(matches!(err, PipelineError::Type { ref column, .. } if column == "gender"));
}

#[test]
fn test_input_untouched() {
    let derived = derive_features(&create_patient_dataframe()).unwrap();
    let filtered = filter_outliers(&derived, &OutlierConfig::default()).unwrap();
    let before = filtered.data.clone();

    let _ = build_correlation(&filtered.data).unwrap();
    assert!(filtered.data.equals(&before));
}
