//! Integration tests for the tabular preprocessing pipeline.
//!
//! These tests verify end-to-end behavior of the pipeline using various datasets.

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tabular_prep::frame::{read_csv, write_csv};
use tabular_prep::{
    ColumnType, Dataset, MissingValueStrategy, OutlierHandler, OutlierStrategy, Pipeline,
    PipelineStage, PreprocessingOptions, ProgressUpdate, Value, correlation_matrix,
    dataset_from_dataframe, dataset_to_dataframe, extract_feature_metadata,
    generate_data_summary, preprocess,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(filename: &str) -> Dataset {
    read_csv(fixtures_path().join(filename), None).expect("Failed to read CSV file")
}

fn options() -> tabular_prep::config::PreprocessingOptionsBuilder {
    PreprocessingOptions::builder()
}

fn number(dataset: &Dataset, row: usize, column: &str) -> f64 {
    dataset
        .get(row, column)
        .and_then(Value::as_f64)
        .unwrap_or_else(|| panic!("row {} column '{}' is not a number", row, column))
}

// ============================================================================
// End-to-End Tests
// ============================================================================

#[test]
fn test_end_to_end_encodes_and_imputes() {
    let dataset = Dataset::from_json(json!([
        {"category": "A", "amount": 10},
        {"category": "B", "amount": 20},
        {"category": "A", "amount": null}
    ]))
    .unwrap();

    let result = preprocess(&dataset, &options().scale_numeric(false).build().unwrap()).unwrap();

    let columns = result.processed_data.columns();
    assert!(columns.contains(&"category_A".to_string()));
    assert!(columns.contains(&"category_B".to_string()));
    assert!(!columns.contains(&"category".to_string()));
    assert_eq!(number(&result.processed_data, 2, "amount"), 15.0);
    assert_eq!(result.target_column.as_deref(), Some("amount"));
    assert_eq!(result.summary.rows_before, 3);
    assert_eq!(result.summary.rows_after, 3);
}

#[test]
fn test_sales_fixture_full_pipeline() {
    let dataset = load_csv("sales.csv");
    assert_eq!(dataset.len(), 8);

    let result = Pipeline::builder().build().unwrap().process(&dataset).unwrap();

    assert_eq!(result.target_column.as_deref(), Some("revenue"));
    assert_eq!(result.processed_data.len(), 8);

    let columns = result.processed_data.columns();
    for expected in ["region_north", "region_south", "region_east", "region_west"] {
        assert!(columns.contains(&expected.to_string()), "missing {}", expected);
    }
    assert!(columns.contains(&"order_date_year".to_string()));
    assert!(columns.contains(&"units_x_discount".to_string()));

    // Mean imputation leaves no gaps in numeric columns
    assert_eq!(result.processed_data.missing_count("discount"), 0);

    let order_date = result.feature_metadata.profile("order_date").unwrap();
    assert_eq!(order_date.column_type, ColumnType::Temporal);
    assert!(!result.correlation_matrix.is_empty());
}

#[test]
fn test_progress_updates_are_ordered() {
    let updates: Arc<Mutex<Vec<ProgressUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);

    Pipeline::builder()
        .on_progress(move |update| sink.lock().unwrap().push(update))
        .build()
        .unwrap()
        .process(&load_csv("no_nulls.csv"))
        .unwrap();

    let updates = updates.lock().unwrap();
    assert_eq!(updates.first().unwrap().stage, PipelineStage::Profiling);
    assert_eq!(updates.last().unwrap().stage, PipelineStage::Complete);
    assert!(
        updates
            .windows(2)
            .all(|w| w[0].progress <= w[1].progress + f32::EPSILON)
    );
}

// ============================================================================
// Edge Case Tests
// ============================================================================

#[test]
fn test_empty_input_is_rejected() {
    let empty = Dataset::default();

    let err = preprocess(&empty, &PreprocessingOptions::default()).unwrap_err();
    assert!(err.is_empty_input());
    assert_eq!(err.error_code(), "EMPTY_INPUT");

    let err = extract_feature_metadata(&empty).unwrap_err();
    assert!(err.is_empty_input());
}

#[test]
fn test_single_row_dataset() {
    let result = preprocess(&load_csv("single_row.csv"), &PreprocessingOptions::default()).unwrap();
    assert_eq!(result.summary.rows_after, 1);
    // A single value has no spread to scale by
    assert!(result.scaling_params.iter().all(|p| p.column != "amount"));
}

#[test]
fn test_drop_without_missing_values_keeps_rows() {
    let dataset = load_csv("no_nulls.csv");
    let options = options()
        .handle_missing(MissingValueStrategy::Drop)
        .build()
        .unwrap();

    let result = preprocess(&dataset, &options).unwrap();
    assert_eq!(result.summary.rows_removed, 0);
    assert_eq!(result.processed_data.len(), dataset.len());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_one_hot_columns_sum_to_one() {
    let dataset = load_csv("no_nulls.csv");
    let result = preprocess(&dataset, &options().scale_numeric(false).build().unwrap()).unwrap();

    for row in result.processed_data.iter() {
        let shade_sum: f64 = row
            .iter()
            .filter(|(k, _)| k.starts_with("shade_"))
            .filter_map(|(_, v)| v.as_f64())
            .sum();
        assert_eq!(shade_sum, 1.0);
    }
}

#[test]
fn test_capping_is_idempotent() {
    let dataset = Dataset::from_json(json!([
        {"reading": 1.0}, {"reading": 2.0}, {"reading": 2.0}, {"reading": 3.0},
        {"reading": 3.0}, {"reading": 3.0}, {"reading": 4.0}, {"reading": 4.0},
        {"reading": 5.0}, {"reading": 100.0}
    ]))
    .unwrap();
    let metadata = extract_feature_metadata(&dataset).unwrap();

    let (once, steps) = OutlierHandler::handle_outliers(&dataset, &metadata, OutlierStrategy::Cap).unwrap();
    let (twice, _) = OutlierHandler::handle_outliers(&once, &metadata, OutlierStrategy::Cap).unwrap();

    assert_eq!(steps.len(), 1);
    assert_eq!(once, twice);
    let upper = metadata
        .profile("reading")
        .and_then(|p| p.numeric_stats())
        .unwrap()
        .upper_fence;
    assert_eq!(number(&once, 9, "reading"), upper);
}

#[test]
fn test_scaling_round_trip() {
    let dataset = load_csv("no_nulls.csv");
    let result = preprocess(&dataset, &PreprocessingOptions::default()).unwrap();

    let weight = result
        .scaling_params
        .iter()
        .find(|p| p.column == "weight")
        .expect("weight should be scaled");

    for (i, row) in dataset.iter().enumerate() {
        let original = row.get("weight").and_then(Value::as_f64).unwrap();
        let scaled = number(&result.processed_data, i, "weight");
        assert!((weight.inverse_transform(scaled) - original).abs() < 1e-9);
    }
}

#[test]
fn test_correlation_matrix_is_symmetric() {
    let dataset = load_csv("no_nulls.csv");
    let matrix = correlation_matrix(&dataset);

    assert_eq!(matrix.len(), 2);
    for (a, row) in &matrix {
        assert_eq!(row[a], 1.0);
        for (b, r) in row {
            assert_eq!(*r, matrix[b][a]);
            assert!((-1.0..=1.0).contains(r));
        }
    }
}

// ============================================================================
// Profiling Tests
// ============================================================================

#[test]
fn test_revenue_is_target_candidate() {
    let metadata = extract_feature_metadata(&load_csv("sales.csv")).unwrap();
    let revenue = metadata.profile("revenue").unwrap();

    assert!(revenue.is_target_candidate);
    assert!((40.0..=100.0).contains(&revenue.target_score));
    assert_eq!(metadata.target_candidates()[0].name, "revenue");
}

#[test]
fn test_numeric_statistics_one_to_ten() {
    let rows: Vec<serde_json::Value> = (1..=10).map(|n| json!({ "reading": n })).collect();
    let dataset = Dataset::from_json(serde_json::Value::Array(rows)).unwrap();
    let metadata = extract_feature_metadata(&dataset).unwrap();
    let stats = metadata.profile("reading").unwrap().numeric_stats().unwrap();

    assert_eq!(stats.count, 10);
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 10.0);
    assert_eq!(stats.mean, 5.5);
    assert_eq!(stats.median, 5.5);
    assert!((stats.variance - 82.5 / 9.0).abs() < 1e-9);
    assert_eq!(stats.q25, 3.0);
    assert_eq!(stats.q75, 8.0);
    assert_eq!(stats.outlier_count, 0);
}

#[test]
fn test_data_summary_lists_columns() {
    let dataset = load_csv("sales.csv");
    let metadata = extract_feature_metadata(&dataset).unwrap();
    let summary = generate_data_summary(&dataset, &metadata);

    assert!(summary.contains("Rows: 8"));
    assert!(summary.contains("order_date [temporal]"));
    assert!(summary.contains("revenue (score"));
}

// ============================================================================
// File and DataFrame Tests
// ============================================================================

#[test]
fn test_dataframe_round_trip() {
    let dataset = Dataset::from_json(json!([
        {"label": "x", "reading": 1.5, "flag": true},
        {"label": null, "reading": 2.0, "flag": false}
    ]))
    .unwrap();

    let df = dataset_to_dataframe(&dataset).unwrap();
    assert_eq!(df.shape(), (2, 3));
    assert_eq!(dataset_from_dataframe(&df).unwrap(), dataset);
}

#[test]
fn test_write_and_read_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out.csv");

    let result = preprocess(&load_csv("sales.csv"), &PreprocessingOptions::default()).unwrap();
    write_csv(&result.processed_data, &path).unwrap();

    let reloaded = read_csv(&path, None).unwrap();
    assert_eq!(reloaded.len(), result.processed_data.len());
    assert_eq!(reloaded.columns(), result.processed_data.all_columns());
}

// ============================================================================
// Feature Selection Tests
// ============================================================================

#[test]
fn test_selection_on_generated_data() {
    let mut rng = StdRng::seed_from_u64(42);
    let rows: Vec<serde_json::Value> = (0..200)
        .map(|_| {
            let x: f64 = rng.gen_range(0.0..10.0);
            let noise: f64 = rng.gen_range(-1.0..1.0);
            let other: f64 = rng.gen_range(0.0..10.0);
            json!({ "x": x, "other": other, "y": 3.0 * x + noise })
        })
        .collect();
    let dataset = Dataset::from_json(serde_json::Value::Array(rows)).unwrap();

    let options = options().feature_selection(true).max_features(1).build().unwrap();
    let result = preprocess(&dataset, &options).unwrap();

    assert_eq!(result.target_column.as_deref(), Some("y"));
    let importance = result.feature_importance.unwrap();
    let (best, score) = importance.first().unwrap();
    assert_eq!(best, "x");
    assert!(*score > 0.9);

    let mut kept = result.processed_data.columns();
    kept.sort();
    assert_eq!(kept, vec!["x".to_string(), "y".to_string()]);
}
