use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::LoadError;
use super::model::{
    LaunchDataset, LaunchRecord, OutcomeClass, BOOSTER_CATEGORY, CLASS, LAUNCH_SITE,
    PAYLOAD_MASS, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming at least the required columns
/// * `.json`    – `[{ "Launch_Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – one column per required field
///
/// Columns other than the required four are ignored.
pub fn load_file(path: &Path) -> Result<LaunchDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };
    log::debug!("parsed {} rows from {}", records.len(), path.display());

    LaunchDataset::from_records(records)
}

// ---------------------------------------------------------------------------
// Shared field parsing
// ---------------------------------------------------------------------------

fn parse_payload(s: &str, row: usize) -> Result<f64, LoadError> {
    s.trim().parse::<f64>().map_err(|e| {
        LoadError::invalid_field(row, PAYLOAD_MASS, format!("'{s}' is not a number: {e}"))
    })
}

/// Accepts `0`/`1` and their float spellings (`0.0`/`1.0`).
fn parse_class(s: &str, row: usize) -> Result<OutcomeClass, LoadError> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return class_from_i64(i, row);
    }
    match s.parse::<f64>() {
        Ok(f) => class_from_f64(f, row),
        Err(_) => Err(LoadError::invalid_field(row, CLASS, format!("'{s}' is not 0 or 1"))),
    }
}

/// Float spelling of a class: only an exact `0.0` or `1.0` is accepted.
fn class_from_f64(value: f64, row: usize) -> Result<OutcomeClass, LoadError> {
    if value.fract() != 0.0 {
        return Err(LoadError::invalid_field(row, CLASS, format!("{value} is not 0 or 1")));
    }
    class_from_i64(value as i64, row)
}

fn class_from_i64(value: i64, row: usize) -> Result<OutcomeClass, LoadError> {
    OutcomeClass::try_from(value).map_err(|msg| LoadError::invalid_field(row, CLASS, msg))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one launch per row.
/// The leading unnamed index column written by `DataFrame.to_csv` is fine.
fn load_csv(path: &Path) -> Result<Vec<LaunchRecord>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::io(path, e))?;
    read_csv(file)
}

fn read_csv<R: std::io::Read>(source: R) -> Result<Vec<LaunchRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    let headers = reader.headers()?.clone();

    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let site_idx = column(LAUNCH_SITE)?;
    let payload_idx = column(PAYLOAD_MASS)?;
    let booster_idx = column(BOOSTER_CATEGORY)?;
    let class_idx = column(CLASS)?;

    let mut records = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let rec = result?;
        let field = |idx: usize| rec.get(idx).unwrap_or("");

        records.push(LaunchRecord {
            launch_site: field(site_idx).to_string(),
            payload_mass_kg: parse_payload(field(payload_idx), row)?,
            booster_version_category: field(booster_idx).to_string(),
            outcome: parse_class(field(class_idx), row)?,
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch_Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 525.0,
///     "Booster Version Category": "v1.0",
///     "class": 0
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<LaunchRecord>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Vec<LaunchRecord>, LoadError> {
    let rows: Vec<Map<String, JsonValue>> = serde_json::from_str(text)?;

    rows.iter()
        .enumerate()
        .map(|(row, obj)| {
            let get = |name: &'static str| obj.get(name).ok_or(LoadError::MissingColumn(name));

            Ok(LaunchRecord {
                launch_site: json_string(get(LAUNCH_SITE)?, row, LAUNCH_SITE)?,
                payload_mass_kg: json_number(get(PAYLOAD_MASS)?, row, PAYLOAD_MASS)?,
                booster_version_category: json_string(
                    get(BOOSTER_CATEGORY)?,
                    row,
                    BOOSTER_CATEGORY,
                )?,
                outcome: json_class(get(CLASS)?, row)?,
            })
        })
        .collect()
}

fn json_string(val: &JsonValue, row: usize, col: &'static str) -> Result<String, LoadError> {
    match val {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Null => Err(LoadError::invalid_field(row, col, "null value")),
        other => Ok(other.to_string()),
    }
}

fn json_number(val: &JsonValue, row: usize, col: &'static str) -> Result<f64, LoadError> {
    match val {
        JsonValue::Number(n) => n
            .as_f64()
            .ok_or_else(|| LoadError::invalid_field(row, col, format!("{n} is out of range"))),
        JsonValue::String(s) => parse_payload(s, row),
        other => Err(LoadError::invalid_field(row, col, format!("{other} is not a number"))),
    }
}

fn json_class(val: &JsonValue, row: usize) -> Result<OutcomeClass, LoadError> {
    match val {
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => class_from_i64(i, row),
            None => parse_class(&n.to_string(), row),
        },
        JsonValue::Bool(b) => Ok(if *b {
            OutcomeClass::Success
        } else {
            OutcomeClass::Failure
        }),
        JsonValue::String(s) => parse_class(s, row),
        other => Err(LoadError::invalid_field(row, CLASS, format!("{other} is not 0 or 1"))),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of launch records.
///
/// Column types are cast rather than matched exactly, so the files written by
/// **Pandas** (`int64` class, `float64` payload) and **Polars** (`i32`, large
/// strings) both load.
fn load_parquet(path: &Path) -> Result<Vec<LaunchRecord>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::io(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let schema = builder.schema().clone();
    for name in REQUIRED_COLUMNS {
        if schema.index_of(name).is_err() {
            return Err(LoadError::MissingColumn(name));
        }
    }

    let reader = builder.build()?;
    let mut records = Vec::new();

    for batch in reader {
        let batch = batch?;
        append_batch(&batch, &mut records)?;
    }

    Ok(records)
}

/// Decode one record batch, continuing the row numbering from `records.len()`.
fn append_batch(batch: &RecordBatch, records: &mut Vec<LaunchRecord>) -> Result<(), LoadError> {
    let sites = column_as(batch, LAUNCH_SITE, &DataType::Utf8)?;
    let payloads = column_as(batch, PAYLOAD_MASS, &DataType::Float64)?;
    let boosters = column_as(batch, BOOSTER_CATEGORY, &DataType::Utf8)?;
    let classes = class_column(batch)?;

    let sites = sites.as_string::<i32>();
    let payloads = payloads.as_primitive::<Float64Type>();
    let boosters = boosters.as_string::<i32>();

    let offset = records.len();
    for i in 0..batch.num_rows() {
        let row = offset + i;
        for (array, name) in [
            (sites as &dyn Array, LAUNCH_SITE),
            (payloads as &dyn Array, PAYLOAD_MASS),
            (boosters as &dyn Array, BOOSTER_CATEGORY),
            (&*classes, CLASS),
        ] {
            if array.is_null(i) {
                return Err(LoadError::invalid_field(row, name, "null value"));
            }
        }

        records.push(LaunchRecord {
            launch_site: sites.value(i).to_string(),
            payload_mass_kg: payloads.value(i),
            booster_version_category: boosters.value(i).to_string(),
            outcome: class_at(&classes, i, row)?,
        });
    }

    Ok(())
}

/// Float class columns stay float so `0.4` or `1.7` are rejected instead of
/// being truncated by the integer cast.
fn class_column(batch: &RecordBatch) -> Result<ArrayRef, LoadError> {
    let col = batch
        .column_by_name(CLASS)
        .ok_or(LoadError::MissingColumn(CLASS))?;
    let to = if col.data_type().is_floating() {
        DataType::Float64
    } else {
        DataType::Int64
    };
    Ok(cast(col.as_ref(), &to)?)
}

fn class_at(classes: &ArrayRef, i: usize, row: usize) -> Result<OutcomeClass, LoadError> {
    match classes.data_type() {
        DataType::Float64 => class_from_f64(classes.as_primitive::<Float64Type>().value(i), row),
        _ => class_from_i64(classes.as_primitive::<Int64Type>().value(i), row),
    }
}

fn column_as(
    batch: &RecordBatch,
    name: &'static str,
    to: &DataType,
) -> Result<ArrayRef, LoadError> {
    let col = batch
        .column_by_name(name)
        .ok_or(LoadError::MissingColumn(name))?;
    Ok(cast(col.as_ref(), to)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int32Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    const HEADER: &str = "Launch_Site,class,Payload Mass (kg),Booster Version Category";

    const CSV: &str = "\
,Flight Number,Launch_Site,class,Payload Mass (kg),Booster Version,Booster Version Category
0,1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
1,2,CCAFS LC-40,0,0.0,F9 v1.0  B0004,v1.0
2,3,CCAFS LC-40,0,525.0,F9 v1.0  B0005,v1.0
3,4,VAFB SLC-4E,0,500.0,F9 v1.1  B1003,v1.1
4,5,KSC LC-39A,1,5300.0,F9 FT B1031.1,FT
";

    fn write_temp(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    fn write_parquet(batch: &RecordBatch) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let out = std::fs::File::create(file.path()).unwrap();
        let mut writer = ArrowWriter::try_new(out, batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
        file
    }

    /// Two-row launch table with the given booster and class columns.
    fn launch_parquet(boosters: StringArray, classes: ArrayRef) -> tempfile::NamedTempFile {
        let schema = Arc::new(Schema::new(vec![
            Field::new(LAUNCH_SITE, DataType::Utf8, false),
            Field::new(PAYLOAD_MASS, DataType::Float64, false),
            Field::new(BOOSTER_CATEGORY, DataType::Utf8, true),
            Field::new(CLASS, classes.data_type().clone(), false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["A", "A"])),
                Arc::new(Float64Array::from(vec![500.0, 2500.0])),
                Arc::new(boosters),
                classes,
            ],
        )
        .unwrap();
        write_parquet(&batch)
    }

    fn csv_row_error(row: &str) -> LoadError {
        let file = write_temp(".csv", format!("{HEADER}\n{row}\n").as_bytes());
        load_file(file.path()).unwrap_err()
    }

    #[test]
    fn loads_csv_and_ignores_extra_columns() {
        let file = write_temp(".csv", CSV.as_bytes());
        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 5);
        assert_eq!(ds.distinct_sites(), ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A"]);
        assert_eq!(ds.min_payload().unwrap(), 0.0);
        assert_eq!(ds.max_payload().unwrap(), 5300.0);

        let last = &ds.records()[4];
        assert_eq!(last.booster_version_category, "FT");
        assert_eq!(last.outcome, OutcomeClass::Success);
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let data = "Launch_Site,class,Payload Mass (kg)\nA,1,10\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(BOOSTER_CATEGORY)));
    }

    #[test]
    fn csv_bad_payload_is_reported_with_row() {
        let data = format!("{HEADER}\nA,1,10,v1\nA,0,heavy,v1\n");
        match read_csv(data.as_bytes()).unwrap_err() {
            LoadError::InvalidField { row, column, .. } => {
                assert_eq!(row, 1);
                assert_eq!(column, PAYLOAD_MASS);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn csv_class_must_be_binary() {
        for class in ["2", "-1", "1.7", "0.4", "yes"] {
            let data = format!("{HEADER}\nA,{class},10,v1\n");
            assert!(
                matches!(
                    read_csv(data.as_bytes()).unwrap_err(),
                    LoadError::InvalidField { column: CLASS, .. }
                ),
                "class {class}"
            );
        }

        let floats = format!("{HEADER}\nA,1.0,10,v1\nA,0.0,10,v1\n");
        let records = read_csv(floats.as_bytes()).unwrap();
        assert_eq!(records[0].outcome, OutcomeClass::Success);
        assert_eq!(records[1].outcome, OutcomeClass::Failure);
    }

    #[test]
    fn csv_empty_cells_are_rejected() {
        for (row, column) in [
            (",1,10,v1", LAUNCH_SITE),
            ("A,,10,v1", CLASS),
            ("A,1,,v1", PAYLOAD_MASS),
            ("A,1,10,", BOOSTER_CATEGORY),
        ] {
            match csv_row_error(row) {
                LoadError::InvalidField { row: 0, column: got, .. } => {
                    assert_eq!(got, column, "row {row:?}")
                }
                other => panic!("row {row:?}: unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn loads_json_records() {
        let text = r#"[
            {"Launch_Site": "A", "Payload Mass (kg)": 5000,
             "Booster Version Category": "v1", "class": 1},
            {"Launch_Site": "A", "Payload Mass (kg)": 3000.5,
             "Booster Version Category": "v1", "class": 0, "Flight Number": 2}
        ]"#;
        let file = write_temp(".json", text.as_bytes());
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].payload_mass_kg, 3000.5);
        assert_eq!(ds.records()[1].outcome, OutcomeClass::Failure);
    }

    #[test]
    fn json_missing_key_is_missing_column() {
        let text = r#"[{"Launch_Site": "A", "Payload Mass (kg)": 1, "class": 1}]"#;
        assert!(matches!(
            parse_json(text).unwrap_err(),
            LoadError::MissingColumn(BOOSTER_CATEGORY)
        ));
    }

    #[test]
    fn json_null_field_is_invalid() {
        for column in REQUIRED_COLUMNS {
            let mut obj = serde_json::json!({
                "Launch_Site": "A",
                "Payload Mass (kg)": 1000.0,
                "Booster Version Category": "FT",
                "class": 1
            });
            obj[column] = JsonValue::Null;
            let text = serde_json::to_string(&[obj]).unwrap();
            match parse_json(&text).unwrap_err() {
                LoadError::InvalidField { row: 0, column: got, .. } => assert_eq!(got, column),
                other => panic!("{column}: unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn json_must_be_array_of_objects() {
        assert!(matches!(parse_json(r#"{"a": 1}"#).unwrap_err(), LoadError::Json(_)));
    }

    #[test]
    fn loads_parquet_with_narrow_types() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(LAUNCH_SITE, DataType::Utf8, false),
            Field::new(PAYLOAD_MASS, DataType::Float64, false),
            Field::new(BOOSTER_CATEGORY, DataType::Utf8, false),
            Field::new(CLASS, DataType::Int32, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["B", "A", "B"])),
                Arc::new(Float64Array::from(vec![8000.0, 5000.0, 100.0])),
                Arc::new(StringArray::from(vec!["v2", "v1", "v2"])),
                Arc::new(Int32Array::from(vec![1, 1, 0])),
            ],
        )
        .unwrap();

        let file = write_parquet(&batch);

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.distinct_sites(), ["B", "A"]);
        assert_eq!(ds.records()[2].outcome, OutcomeClass::Failure);
        assert_eq!(ds.min_payload().unwrap(), 100.0);
    }

    #[test]
    fn loads_parquet_float_class() {
        let file = launch_parquet(
            StringArray::from(vec!["v1", "v1"]),
            Arc::new(Float64Array::from(vec![1.0, 0.0])),
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records()[0].outcome, OutcomeClass::Success);
        assert_eq!(ds.records()[1].outcome, OutcomeClass::Failure);
    }

    #[test]
    fn loads_parquet_rejects_fractional_class() {
        for classes in [vec![1.0, 1.7], vec![0.0, 0.4]] {
            let file = launch_parquet(
                StringArray::from(vec!["v1", "v1"]),
                Arc::new(Float64Array::from(classes)),
            );
            assert!(matches!(
                load_file(file.path()).unwrap_err(),
                LoadError::InvalidField { row: 1, column: CLASS, .. }
            ));
        }

        let file = launch_parquet(
            StringArray::from(vec!["v1", "v1"]),
            Arc::new(Int64Array::from(vec![1, 2])),
        );
        assert!(matches!(
            load_file(file.path()).unwrap_err(),
            LoadError::InvalidField { row: 1, column: CLASS, .. }
        ));
    }

    #[test]
    fn parquet_null_cell_is_invalid() {
        let file = launch_parquet(
            StringArray::from(vec![Some("v1"), None]),
            Arc::new(Int64Array::from(vec![1, 0])),
        );
        assert!(matches!(
            load_file(file.path()).unwrap_err(),
            LoadError::InvalidField { row: 1, column: BOOSTER_CATEGORY, .. }
        ));
    }

    #[test]
    fn parquet_missing_column_is_reported() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(LAUNCH_SITE, DataType::Utf8, false),
            Field::new(PAYLOAD_MASS, DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["A"])),
                Arc::new(Float64Array::from(vec![1.0])),
            ],
        )
        .unwrap();

        let file = write_parquet(&batch);

        assert!(matches!(
            load_file(file.path()).unwrap_err(),
            LoadError::MissingColumn(BOOSTER_CATEGORY)
        ));
    }

    #[test]
    fn unreadable_and_unsupported_sources_fail() {
        assert!(matches!(
            load_file(Path::new("/nonexistent/launches.csv")).unwrap_err(),
            LoadError::Io { .. }
        ));
        assert!(matches!(
            load_file(Path::new("launches.xlsx")).unwrap_err(),
            LoadError::UnsupportedFormat(ext) if ext == "xlsx"
        ));
    }
}
