use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Cell, RawRecord, RawTable, SeedRow, SeedTable, TableSchema};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a rate table and extract its seeds.
///
/// `rate_type` is the rate column the caller is going to aggregate; it is
/// checked for presence together with the columns named in `schema`.
pub fn load_table(
    path: &Path,
    schema: &TableSchema,
    rate_type: &str,
) -> Result<SeedTable, LoadError> {
    let raw = load_raw(path)?;
    info!(
        "read {} rows × {} columns from {}",
        raw.records.len(),
        raw.headers.len(),
        path.display()
    );
    into_seed_table(path, raw, schema, rate_type)
}

/// Read a table without interpreting it.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` – flat columns, one row per seed
/// * `.json`    – `[{ "L1SeedName": "...", "rate0": 1.0, ... }, ...]`
/// * anything else – comma-separated with a header row
pub fn load_raw(path: &Path) -> Result<RawTable, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        _ => load_csv(path),
    }
}

// ---------------------------------------------------------------------------
// Seed extraction
// ---------------------------------------------------------------------------

fn into_seed_table(
    path: &Path,
    raw: RawTable,
    schema: &TableSchema,
    rate_type: &str,
) -> Result<SeedTable, LoadError> {
    let required = schema.required_columns(rate_type);
    for column in &required {
        if !raw.headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }

    let mut rows = Vec::with_capacity(raw.records.len());
    for (row_no, record) in raw.records.into_iter().enumerate() {
        rows.push(seed_from_record(row_no, record, schema, &required)?);
    }

    Ok(SeedTable::from_rows(raw.headers, rows))
}

fn seed_from_record(
    row_no: usize,
    mut record: RawRecord,
    schema: &TableSchema,
    required: &[&str],
) -> Result<SeedRow, LoadError> {
    let name = match record.remove(&schema.name_column) {
        Some(Cell::Text(s)) => s,
        Some(Cell::Number(v)) => v.to_string(),
        Some(Cell::Null) | None => return Err(LoadError::MissingName { row: row_no }),
    };

    let prescale = match record.remove(&schema.prescale_column) {
        Some(Cell::Number(v)) => Some(v),
        Some(Cell::Null) | None => None,
        Some(Cell::Text(s)) => {
            return Err(LoadError::InvalidNumber {
                row: row_no,
                column: schema.prescale_column.clone(),
                value: s,
            })
        }
    };

    let mut rates = BTreeMap::new();
    for (column, cell) in record {
        match cell {
            Cell::Number(v) => {
                rates.insert(column, v);
            }
            Cell::Null => {}
            Cell::Text(value) if required.contains(&column.as_str()) => {
                return Err(LoadError::InvalidNumber {
                    row: row_no,
                    column,
                    value,
                });
            }
            Cell::Text(value) => {
                debug!("row {row_no}: ignoring non-numeric '{column}' = '{value}'");
            }
        }
    }

    Ok(SeedRow {
        name,
        prescale,
        rates,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one seed per line, e.g.
///
/// ```text
/// n,L1SeedName,pre-scale0,rate0,rate0 err,pure0,propotional0
/// 0,L1_SingleMu22,1,3960.02,21.3,1510.7,2790.4
/// ```
fn load_csv(path: &Path) -> Result<RawTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: RawRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), Cell::guess(value)))
            .collect();
        records.push(row);
    }

    Ok(RawTable { headers, records })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "L1SeedName": "L1_SingleMu22", "pre-scale0": 1, "rate0": 3960.02 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<RawTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let rows = root.as_array().ok_or_else(|| {
        LoadError::UnsupportedLayout("expected a top-level JSON array of records".into())
    })?;

    let mut headers: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(rows.len());

    for (i, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::UnsupportedLayout(format!("row {i} is not a JSON object")))?;

        let mut row = RawRecord::new();
        for (key, val) in obj {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
            row.insert(key.clone(), json_to_cell(val));
        }
        records.push(row);
    }

    Ok(RawTable { headers, records })
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::Number(n) => n.as_f64().map(Cell::number).unwrap_or(Cell::Null),
        JsonValue::String(s) => Cell::guess(s),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per table column.
///
/// Text columns (Utf8 / LargeUtf8) and numeric columns (Int32, Int64,
/// Float32, Float64) are read; columns of other types are skipped.
fn load_parquet(path: &Path) -> Result<RawTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut headers: Vec<String> = Vec::new();
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        if headers.is_empty() {
            headers = schema.fields().iter().map(|f| f.name().clone()).collect();
        }

        for row in 0..batch.num_rows() {
            let mut record = RawRecord::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                if let Some(cell) = extract_cell(batch.column(col_idx), row) {
                    record.insert(field.name().clone(), cell);
                }
            }
            records.push(record);
        }
    }

    Ok(RawTable { headers, records })
}

/// Extract one cell from an Arrow column; `None` for unsupported types.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Option<Cell> {
    if col.is_null(row) {
        return Some(Cell::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => {
            let arr = col.as_any().downcast_ref::<StringArray>()?;
            Cell::Text(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col.as_any().downcast_ref::<LargeStringArray>()?;
            Cell::Text(arr.value(row).to_string())
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>()?;
            Cell::Number(arr.value(row) as f64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>()?;
            Cell::Number(arr.value(row) as f64)
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>()?;
            Cell::number(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>()?;
            Cell::number(arr.value(row))
        }
        _ => return None,
    };
    Some(cell)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const CSV: &str = "\
n,L1SeedName,pre-scale0,rate0,pure0,propotional0
0,L1_SingleMu22,1,3960.02,1510.7,2790.4
1,L1_IsolatedBunch,100,12.5,,
2,L1_ETT2000,,4.0,1.0,2.0
";

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_csv_rows() {
        let file = write_temp(".csv", CSV);
        let table = load_table(file.path(), &TableSchema::default(), "propotional0").unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.headers[1], "L1SeedName");

        let mu = &table.rows[0];
        assert_eq!(mu.name, "L1_SingleMu22");
        assert_eq!(mu.prescale, Some(1.0));
        assert_eq!(mu.rate("propotional0"), Some(2790.4));
        assert_eq!(mu.rate("n"), Some(0.0));

        let bunch = &table.rows[1];
        assert_eq!(bunch.prescale, Some(100.0));
        assert_eq!(bunch.rate("pure0"), None);

        assert_eq!(table.rows[2].prescale, None);
    }

    #[test]
    fn missing_rate_column_is_reported() {
        let file = write_temp(".csv", CSV);
        let err = load_table(file.path(), &TableSchema::default(), "rate1").unwrap_err();
        match err {
            LoadError::MissingColumn { column, .. } => assert_eq!(column, "rate1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_required_cell_is_an_error() {
        let file = write_temp(
            ".csv",
            "L1SeedName,pre-scale0,rate0\nL1_SingleJet180,1,lots\n",
        );
        let err = load_table(file.path(), &TableSchema::default(), "rate0").unwrap_err();
        assert!(matches!(err, LoadError::InvalidNumber { row: 0, .. }), "{err}");
    }

    #[test]
    fn non_numeric_optional_cell_is_ignored() {
        let file = write_temp(
            ".csv",
            "L1SeedName,pre-scale0,rate0,comment\nL1_SingleJet180,1,5.0,new in 2018\n",
        );
        let table = load_table(file.path(), &TableSchema::default(), "rate0").unwrap();
        assert_eq!(table.rows[0].rate("comment"), None);
    }

    #[test]
    fn missing_value_tokens_load_as_empty() {
        let file = write_temp(
            ".csv",
            "L1SeedName,pre-scale0,rate0\n\
             L1_SingleMu22,1,100.0\n\
             L1_SingleMu25,1,NaN\n\
             L1_SingleMu18,NA,N/A\n\
             L1_SingleMu16,1,null\n",
        );
        let table = load_table(file.path(), &TableSchema::default(), "rate0").unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows[0].rate("rate0"), Some(100.0));
        assert_eq!(table.rows[1].rate("rate0"), None);
        assert_eq!(table.rows[2].prescale, None);
        assert_eq!(table.rows[2].rate("rate0"), None);
        assert_eq!(table.rows[3].rate("rate0"), None);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = load_table(&path, &TableSchema::default(), "rate0").unwrap_err();
        assert!(matches!(err, LoadError::NotFound(p) if p == path));
    }

    #[test]
    fn loads_json_records() {
        let file = write_temp(
            ".json",
            r#"[
                {"L1SeedName": "L1_DoubleEG_25_12", "pre-scale0": 1, "rate0": 812.5},
                {"L1SeedName": "L1_FirstBunchInTrain", "pre-scale0": 23, "rate0": null}
            ]"#,
        );
        let table = load_table(file.path(), &TableSchema::default(), "rate0").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].rate("rate0"), Some(812.5));
        assert_eq!(table.rows[1].prescale, Some(23.0));
        assert_eq!(table.rows[1].rate("rate0"), None);
    }

    #[test]
    fn json_must_be_an_array() {
        let file = write_temp(".json", r#"{"L1SeedName": "L1_ZeroBias"}"#);
        let err = load_raw(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedLayout(_)));
    }

    #[test]
    fn loads_parquet_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("L1SeedName", DataType::Utf8, false),
            Field::new("pre-scale0", DataType::Int64, false),
            Field::new("rate0", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![
                    "L1_SingleTau120er2p1",
                    "L1_HTT280er",
                    "L1_ETMHF100",
                ])),
                Arc::new(Int64Array::from(vec![1, 1, 1])),
                Arc::new(Float64Array::from(vec![Some(91.0), None, Some(f64::NAN)])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_table(file.path(), &TableSchema::default(), "rate0").unwrap();
        assert_eq!(table.headers, ["L1SeedName", "pre-scale0", "rate0"]);
        assert_eq!(table.rows[0].name, "L1_SingleTau120er2p1");
        assert_eq!(table.rows[0].prescale, Some(1.0));
        assert_eq!(table.rows[0].rate("rate0"), Some(91.0));
        assert_eq!(table.rows[1].rate("rate0"), None);
        assert_eq!(table.rows[2].rate("rate0"), None);
    }
}
