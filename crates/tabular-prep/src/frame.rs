//! Bridge between polars `DataFrame`s and the row-oriented [`Dataset`].
//!
//! Ingestion reads files through polars, converts them to rows for the
//! pipeline, and converts the processed rows back for CSV output.

use crate::dataset::{Dataset, Row, Value};
use crate::error::{PreprocessingError, Result, ResultExt};
use crate::utils::parse_datetime_str;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Number of rows polars inspects to infer the CSV schema.
const SCHEMA_INFERENCE_ROWS: usize = 100;

// ============================================================================
// DataFrame -> Dataset
// ============================================================================

/// Convert a `DataFrame` into rows, keeping column order.
///
/// Numeric columns become numbers, boolean columns booleans, date and
/// datetime columns date-times, and everything else text.
pub fn dataset_from_dataframe(df: &DataFrame) -> Result<Dataset> {
    let mut rows: Vec<Row> = (0..df.height())
        .map(|_| Row::with_capacity(df.width()))
        .collect();

    for column in df.get_columns() {
        let name = column.name().to_string();
        let values = column_values(column).context(format!("Failed to convert column '{}'", name))?;
        for (row, value) in rows.iter_mut().zip(values) {
            row.insert(name.clone(), value);
        }
    }

    Ok(Dataset::new(rows))
}

fn column_values(column: &Column) -> PolarsResult<Vec<Value>> {
    let values: Vec<Value> = match column.dtype() {
        DataType::Boolean => column.bool()?.into_iter().map(Value::from).collect(),
        DataType::String => column.str()?.into_iter().map(Value::from).collect(),
        dtype if dtype.is_primitive_numeric() => {
            let floats = column.cast(&DataType::Float64)?;
            floats.f64()?.into_iter().map(Value::from).collect()
        }
        DataType::Date | DataType::Datetime(_, _) => {
            let text = column.cast(&DataType::String)?;
            text.str()?
                .into_iter()
                .map(|v| match v {
                    Some(s) => parse_datetime_str(s)
                        .map(Value::DateTime)
                        .unwrap_or_else(|| Value::from(s)),
                    None => Value::Null,
                })
                .collect()
        }
        _ => {
            let text = column.cast(&DataType::String)?;
            text.str()?.into_iter().map(Value::from).collect()
        }
    };
    Ok(values)
}

// ============================================================================
// Dataset -> DataFrame
// ============================================================================

/// Convert rows into a `DataFrame`.
///
/// Columns are the union of every row's keys. A column becomes `Float64`
/// when all its present values are numbers, `Boolean` when all are
/// booleans, and `String` otherwise.
pub fn dataset_to_dataframe(dataset: &Dataset) -> Result<DataFrame> {
    let columns: Vec<Column> = dataset
        .all_columns()
        .iter()
        .map(|name| build_column(dataset, name))
        .collect();
    Ok(DataFrame::new(columns)?)
}

fn build_column(dataset: &Dataset, name: &str) -> Column {
    let values: Vec<&Value> = dataset.column_values(name).collect();
    let present = || values.iter().filter(|v| !v.is_missing());

    if present().all(|v| matches!(v, Value::Number(_))) {
        let data: Vec<Option<f64>> = values.iter().map(|v| v.as_f64()).collect();
        Column::new(name.into(), data)
    } else if present().all(|v| matches!(v, Value::Bool(_))) {
        let data: Vec<Option<bool>> = values
            .iter()
            .map(|v| match v {
                Value::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        Column::new(name.into(), data)
    } else {
        let data: Vec<Option<String>> = values
            .iter()
            .map(|v| (!v.is_missing()).then(|| v.to_key()))
            .collect();
        Column::new(name.into(), data)
    }
}

// ============================================================================
// File I/O
// ============================================================================

/// Read a CSV file with a header row.
pub fn read_csv(path: impl AsRef<Path>, max_rows: Option<usize>) -> Result<Dataset> {
    let path = path.as_ref();
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(SCHEMA_INFERENCE_ROWS))
        .with_has_header(true)
        .with_n_rows(max_rows)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .context(format!("Failed to open {}", path.display()))?
        .finish()
        .context(format!("Failed to parse {}", path.display()))?;

    debug!(shape = ?df.shape(), "Loaded CSV");
    dataset_from_dataframe(&df)
}

/// Read a JSON array of objects.
pub fn read_json(path: impl AsRef<Path>, max_rows: Option<usize>) -> Result<Dataset> {
    let content = fs::read_to_string(path.as_ref())?;
    let dataset: Dataset = serde_json::from_str(&content)?;
    Ok(match max_rows {
        Some(limit) if dataset.len() > limit => dataset.into_iter().take(limit).collect(),
        _ => dataset,
    })
}

/// Read a `.csv` or `.json` file, chosen by extension.
pub fn read_dataset(path: impl AsRef<Path>, max_rows: Option<usize>) -> Result<Dataset> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => read_csv(path, max_rows),
        Some("json") => read_json(path, max_rows),
        other => Err(PreprocessingError::InvalidConfig(format!(
            "Unsupported input format: {} (expected .csv or .json)",
            other.unwrap_or("none")
        ))),
    }
}

/// Write a dataset as CSV with a header row, creating parent directories.
pub fn write_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut df = dataset_to_dataframe(dataset)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context(format!("Failed to write {}", path.display()))?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dataframe_to_dataset() {
        let df = DataFrame::new(vec![
            Column::new("qty".into(), vec![Some(1i64), None, Some(3)]),
            Column::new("name".into(), vec![Some("a"), Some("b"), None]),
            Column::new("flag".into(), vec![true, false, true]),
        ])
        .unwrap();

        let dataset = dataset_from_dataframe(&df).unwrap();
        assert_eq!(dataset.columns(), vec!["qty", "name", "flag"]);
        assert_eq!(dataset.get(0, "qty"), Some(&Value::Number(1.0)));
        assert_eq!(dataset.get(1, "qty"), Some(&Value::Null));
        assert_eq!(dataset.get(1, "name"), Some(&Value::from("b")));
        assert_eq!(dataset.get(2, "name"), Some(&Value::Null));
        assert_eq!(dataset.get(1, "flag"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_dataset_to_dataframe_dtypes() {
        let dataset = Dataset::from_json(json!([
            {"x": 1.5, "tag": "a", "ok": true},
            {"x": null, "tag": 7, "ok": null}
        ]))
        .unwrap();

        let df = dataset_to_dataframe(&dataset).unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.column("x").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("tag").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("ok").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(df.column("x").unwrap().null_count(), 1);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = read_dataset("data.parquet", None).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
