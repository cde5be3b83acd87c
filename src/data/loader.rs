use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{cast, cast_with_options, CastOptions};
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{Column, Dataset, Transaction, VALUE_HEADER};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a transactions dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one transaction per line (recommended)
/// * `.json`    – `[{ "Category": "...", "Value": 123.4, ... }, ...]`
/// * `.parquet` – string columns plus a numeric `Value` column
///
/// Columns other than the six categorical ones and `Value` are ignored.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            read_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_json(&text)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedExtension(other.to_string()).into()),
    };

    if dataset.is_empty() {
        return Err(DataError::Empty.into());
    }
    log::info!(
        "Loaded {} transactions from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// Positions of the required columns in a header row / schema.
struct HeaderIndex {
    categorical: [usize; 6],
    value: usize,
}

impl HeaderIndex {
    fn resolve(position: impl Fn(&str) -> Option<usize>) -> Result<Self, DataError> {
        let mut categorical = [0usize; 6];
        for (slot, column) in categorical.iter_mut().zip(Column::ALL) {
            *slot = position(column.header()).ok_or(DataError::MissingColumn(column.header()))?;
        }
        let value = position(VALUE_HEADER).ok_or(DataError::MissingColumn(VALUE_HEADER))?;
        Ok(HeaderIndex { categorical, value })
    }
}

/// Assemble a transaction from the six categorical cells (in [`Column::ALL`]
/// order) and the parsed value.
fn build_transaction(mut cells: [String; 6], value: Option<f64>) -> Transaction {
    let mut take = |i: usize| std::mem::take(&mut cells[i]);
    Transaction {
        category: take(0),
        import_export: take(1),
        payment_terms: take(2),
        shipping_method: take(3),
        customer: take(4),
        country: take(5),
        value,
    }
}

/// Parse a textual `Value` cell. Empty and NaN cells are missing, anything
/// else must be a finite number.
fn parse_value(raw: &str, row: usize) -> Result<Option<f64>, DataError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let number = trimmed.parse::<f64>().map_err(|_| invalid_value(raw, row))?;
    finite_value(number, raw, row)
}

/// NaN marks a missing value; infinities are rejected.
fn finite_value(number: f64, raw: &str, row: usize) -> Result<Option<f64>, DataError> {
    if number.is_nan() {
        Ok(None)
    } else if number.is_infinite() {
        Err(invalid_value(raw, row))
    } else {
        Ok(Some(number))
    }
}

fn invalid_value(raw: &str, row: usize) -> DataError {
    DataError::InvalidValue {
        row,
        column: VALUE_HEADER,
        raw: raw.to_string(),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read comma-separated transactions with a header row.
pub fn read_csv<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let index = HeaderIndex::resolve(|name| headers.iter().position(|h| h.trim() == name))?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells = index
            .categorical
            .map(|i| record.get(i).unwrap_or("").to_string());
        let value = parse_value(record.get(index.value).unwrap_or(""), row_no)?;
        rows.push(build_transaction(cells, value));
    }

    Ok(Dataset::from_rows(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `to_json(orient='records')`):
///
/// ```json
/// [
///   { "Category": "Toys", "Import_Export": "Export", "Value": 3120.5, ... },
///   ...
/// ]
/// ```
pub fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut cells: [String; 6] = Default::default();
        for (cell, column) in cells.iter_mut().zip(Column::ALL) {
            let val = obj
                .get(column.header())
                .ok_or(DataError::MissingColumn(column.header()))?;
            *cell = json_to_label(val);
        }

        let value = match obj.get(VALUE_HEADER) {
            None => return Err(DataError::MissingColumn(VALUE_HEADER).into()),
            Some(JsonValue::Null) => None,
            Some(JsonValue::Number(n)) => n.as_f64(),
            Some(JsonValue::String(s)) => parse_value(s, i)?,
            Some(other) => return Err(invalid_value(&other.to_string(), i).into()),
        };

        rows.push(build_transaction(cells, value));
    }

    Ok(Dataset::from_rows(rows))
}

fn json_to_label(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of transactions.
///
/// Categorical columns may be any type castable to Utf8 (plain strings,
/// large strings, dictionaries); `Value` any numeric or text type.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let index = HeaderIndex::resolve(|name| schema.index_of(name).ok())?;

        let mut text_columns: Vec<ArrayRef> = Vec::with_capacity(6);
        for (i, column) in index.categorical.iter().zip(Column::ALL) {
            text_columns.push(cast_column(batch.column(*i), &DataType::Utf8, column.header())?);
        }
        let values = value_column(batch.column(index.value), rows.len())?;

        for row in 0..batch.num_rows() {
            let mut cells: [String; 6] = Default::default();
            for (cell, array) in cells.iter_mut().zip(&text_columns) {
                let strings = array.as_string::<i32>();
                if !strings.is_null(row) {
                    *cell = strings.value(row).to_string();
                }
            }
            rows.push(build_transaction(cells, values[row]));
        }
    }

    Ok(Dataset::from_rows(rows))
}

/// Decode one batch's `Value` column. Text cells go through [`parse_value`];
/// numeric columns are cast to `Float64` without silently nulling failures.
fn value_column(array: &ArrayRef, first_row: usize) -> Result<Vec<Option<f64>>, DataError> {
    if is_textual(array.data_type()) {
        let text = cast_column(array, &DataType::Utf8, VALUE_HEADER)?;
        let text = text.as_string::<i32>();
        return (0..text.len())
            .map(|i| {
                if text.is_null(i) {
                    Ok(None)
                } else {
                    parse_value(text.value(i), first_row + i)
                }
            })
            .collect();
    }

    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    let numbers = cast_with_options(array, &DataType::Float64, &options).map_err(|_| {
        DataError::UnsupportedType {
            column: VALUE_HEADER,
            data_type: format!("{:?}", array.data_type()),
        }
    })?;
    let numbers = numbers.as_primitive::<Float64Type>();
    (0..numbers.len())
        .map(|i| {
            if numbers.is_null(i) {
                return Ok(None);
            }
            let number = numbers.value(i);
            finite_value(number, &number.to_string(), first_row + i)
        })
        .collect()
}

fn is_textual(data_type: &DataType) -> bool {
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => true,
        DataType::Dictionary(_, values) => is_textual(values),
        _ => false,
    }
}

fn cast_column(
    array: &ArrayRef,
    to: &DataType,
    column: &'static str,
) -> Result<ArrayRef, DataError> {
    cast(array, to).map_err(|_| DataError::UnsupportedType {
        column,
        data_type: format!("{:?}", array.data_type()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Transaction_ID,Country,Product,Import_Export,Value,\
                          Category,Customer,Payment_Terms,Shipping_Method\n";

    #[test]
    fn csv_reads_required_columns_and_ignores_extras() {
        let text = format!(
            "{HEADER}T1,Chile,Widget,Import,100.5,Electronics,Acme,Prepaid,Air\n\
             T2,Peru,Gadget,Export,,Toys,Globex,Net 30,Sea\n"
        );
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);

        let first = &ds.rows()[0];
        assert_eq!(first.category, "Electronics");
        assert_eq!(first.country, "Chile");
        assert_eq!(first.value, Some(100.5));

        let second = &ds.rows()[1];
        assert_eq!(second.payment_terms, "Net 30");
        assert_eq!(second.value, None);
    }

    #[test]
    fn csv_missing_column_is_an_error() {
        let text = "Category,Import_Export,Value\nToys,Export,1\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("missing required column"));
    }

    #[test]
    fn csv_non_numeric_value_is_an_error() {
        let text = format!("{HEADER}T1,Chile,Widget,Import,lots,Electronics,Acme,Prepaid,Air\n");
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("'lots' is not a valid value"));
    }

    #[test]
    fn signed_nan_is_missing() {
        for raw in ["nan", "NaN", "-nan", "+NaN"] {
            assert_eq!(parse_value(raw, 0).unwrap(), None, "{raw}");
        }
        assert_eq!(parse_value(" 10 ", 0).unwrap(), Some(10.0));

        let text = format!(
            "{HEADER}T1,Chile,Widget,Import,10,Toys,Acme,Prepaid,Air\n\
             T2,Chile,Widget,Import,-nan,Toys,Acme,Prepaid,Air\n"
        );
        let ds = read_csv(text.as_bytes()).unwrap();
        let values: Vec<Option<f64>> = ds.rows().iter().map(|r| r.value).collect();
        assert_eq!(values, [Some(10.0), None]);
    }

    #[test]
    fn infinite_value_is_an_error() {
        for raw in ["inf", "-inf", "Infinity"] {
            let err = parse_value(raw, 3).unwrap_err();
            assert!(matches!(err, DataError::InvalidValue { row: 3, .. }), "{raw}");
        }
    }

    #[test]
    fn json_records_with_null_value() {
        let text = r#"[
            {"Category": "Toys", "Import_Export": "Export", "Payment_Terms": "Prepaid",
             "Shipping_Method": "Air", "Customer": "Acme", "Country": "Chile", "Value": 12},
            {"Category": "Food", "Import_Export": "Import", "Payment_Terms": "Net 60",
             "Shipping_Method": "Land", "Customer": "Globex", "Country": "Peru", "Value": null}
        ]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0].value, Some(12.0));
        assert_eq!(ds.rows()[1].value, None);
        assert_eq!(ds.rows()[1].shipping_method, "Land");
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("transactions.xlsx")).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported file extension: .xlsx"));
    }
}
