use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{Dataset, LaunchRecord, Outcome, RecordError};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Accepted header spellings per field; the first is canonical.
const SITE_COLUMNS: &[&str] = &["launch_site", "Launch Site"];
const PAYLOAD_COLUMNS: &[&str] = &["payload_mass", "Payload Mass (kg)"];
const OUTCOME_COLUMNS: &[&str] = &["class", "outcome"];
const BOOSTER_COLUMNS: &[&str] = &["Booster Version Category", "booster_category"];

fn find_column<'a, I>(headers: I, accepted: &[&str]) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let headers: Vec<&str> = headers.into_iter().collect();
    accepted
        .iter()
        .find_map(|name| headers.iter().position(|h| h == name))
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat table, one row per launch
/// * `.json`    – `[{ "launch_site": ..., "payload_mass": ..., ... }, ...]`
/// * `.csv`     – header row plus one row per launch
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`).
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        records.push(json_record(obj).with_context(|| format!("JSON row {i}"))?);
    }
    Ok(Dataset::from_records(records))
}

fn json_field<'a>(
    obj: &'a Map<String, JsonValue>,
    accepted: &[&'static str],
) -> Result<&'a JsonValue, RecordError> {
    accepted
        .iter()
        .find_map(|k| obj.get(*k))
        .ok_or(RecordError::MissingColumn(accepted[0]))
}

fn json_record(obj: &Map<String, JsonValue>) -> Result<LaunchRecord> {
    let site = json_text(json_field(obj, SITE_COLUMNS)?);
    let mass_val = json_field(obj, PAYLOAD_COLUMNS)?;
    let mass = mass_val
        .as_f64()
        .with_context(|| format!("payload mass {mass_val} is not a number"))?;
    let outcome = match json_field(obj, OUTCOME_COLUMNS)? {
        JsonValue::Bool(b) => outcome_from_bool(*b),
        JsonValue::Number(n) => parse_outcome(&n.to_string())?,
        JsonValue::String(s) => parse_outcome(s)?,
        other => return Err(RecordError::InvalidOutcome(other.to_string()).into()),
    };
    let booster = json_text(json_field(obj, BOOSTER_COLUMNS)?);
    Ok(LaunchRecord::new(site, mass, outcome, booster)?)
}

fn json_text(v: &JsonValue) -> String {
    match v {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Dataset> {
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let site_idx = find_column(headers.iter(), SITE_COLUMNS)
        .ok_or(RecordError::MissingColumn(SITE_COLUMNS[0]))?;
    let mass_idx = find_column(headers.iter(), PAYLOAD_COLUMNS)
        .ok_or(RecordError::MissingColumn(PAYLOAD_COLUMNS[0]))?;
    let outcome_idx = find_column(headers.iter(), OUTCOME_COLUMNS)
        .ok_or(RecordError::MissingColumn(OUTCOME_COLUMNS[0]))?;
    let booster_idx = find_column(headers.iter(), BOOSTER_COLUMNS)
        .ok_or(RecordError::MissingColumn(BOOSTER_COLUMNS[0]))?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| row.get(idx).unwrap_or("").trim();

        let mass_text = cell(mass_idx);
        let mass: f64 = mass_text
            .parse()
            .with_context(|| format!("CSV row {row_no}: '{mass_text}' is not a number"))?;
        let outcome =
            parse_outcome(cell(outcome_idx)).with_context(|| format!("CSV row {row_no}"))?;
        let rec = LaunchRecord::new(cell(site_idx), mass, outcome, cell(booster_idx))
            .with_context(|| format!("CSV row {row_no}"))?;
        records.push(rec);
    }
    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table, as written by `df.to_parquet()` or by the
/// `generate_sample` binary.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        records.extend(batch_records(&batch)?);
    }
    Ok(Dataset::from_records(records))
}

fn schema_column(schema: &Schema, accepted: &[&'static str]) -> Result<usize, RecordError> {
    find_column(
        schema.fields().iter().map(|f| f.name().as_str()),
        accepted,
    )
    .ok_or(RecordError::MissingColumn(accepted[0]))
}

/// Convert one Arrow batch into records.
fn batch_records(batch: &RecordBatch) -> Result<Vec<LaunchRecord>> {
    let schema = batch.schema();
    let site_col = batch.column(schema_column(&schema, SITE_COLUMNS)?);
    let mass_col = batch.column(schema_column(&schema, PAYLOAD_COLUMNS)?);
    let outcome_col = batch.column(schema_column(&schema, OUTCOME_COLUMNS)?);
    let booster_col = batch.column(schema_column(&schema, BOOSTER_COLUMNS)?);

    (0..batch.num_rows())
        .map(|row| {
            let mass = extract_f64(mass_col, row)
                .with_context(|| format!("Row {row}: failed to read payload mass"))?;
            let outcome = extract_outcome(outcome_col, row)
                .with_context(|| format!("Row {row}: failed to read class"))?;
            let rec = LaunchRecord::new(
                extract_text(site_col, row)?,
                mass,
                outcome,
                extract_text(booster_col, row)?,
            )
            .with_context(|| format!("Row {row}"))?;
            Ok(rec)
        })
        .collect()
}

// -- Arrow helpers --

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in numeric column");
    }
    let any = col.as_any();
    let v = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| f64::from(a.value(row))),
        other => bail!("Expected numeric column, got {other:?}"),
    };
    v.context("column array does not match its declared type")
}

fn extract_outcome(col: &Arc<dyn Array>, row: usize) -> Result<Outcome> {
    if let DataType::Boolean = col.data_type() {
        let arr = col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .context("expected BooleanArray")?;
        return Ok(outcome_from_bool(arr.value(row)));
    }
    if matches!(col.data_type(), DataType::Utf8 | DataType::LargeUtf8) {
        return Ok(parse_outcome(&extract_text(col, row)?)?);
    }
    let v = extract_f64(col, row)?;
    Ok(parse_outcome(&v.to_string())?)
}

fn extract_text(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in text column");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("Expected string column, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Outcome parsing shared by all formats
// ---------------------------------------------------------------------------

fn outcome_from_bool(b: bool) -> Outcome {
    if b {
        Outcome::Success
    } else {
        Outcome::Failure
    }
}

/// Accepts `1`/`0`, their float spellings (`1.0`), and `true`/`false`.
fn parse_outcome(s: &str) -> Result<Outcome, RecordError> {
    let s = s.trim();
    match s {
        "true" | "True" => return Ok(Outcome::Success),
        "false" | "False" => return Ok(Outcome::Failure),
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return Outcome::try_from(i);
    }
    match s.parse::<f64>() {
        Ok(f) if f == 0.0 => Ok(Outcome::Failure),
        Ok(f) if f == 1.0 => Ok(Outcome::Success),
        _ => Err(RecordError::InvalidOutcome(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use arrow::array::ArrayRef;
    use arrow::datatypes::Field;

    const SAMPLE_CSV: &str = "\
launch_site,payload_mass,class,Booster Version Category
CCAFS LC-40,1000,1,v1.0
VAFB SLC-4E,2000,0,v1.1
CCAFS LC-40,1500,1,v1.2
KSC LC-39A,2500,1,v1.1
VAFB SLC-4E,3000,0,v1.0
";

    #[test]
    fn csv_matches_builtin_sample() {
        let ds = read_csv(csv::Reader::from_reader(SAMPLE_CSV.as_bytes())).unwrap();
        assert_eq!(ds.records(), Dataset::sample().records());
    }

    #[test]
    fn csv_accepts_header_aliases() {
        let text = "Launch Site,Payload Mass (kg),outcome,booster_category\nKSC LC-39A,500.5,1.0,FT\n";
        let ds = read_csv(csv::Reader::from_reader(text.as_bytes())).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].payload_mass, 500.5);
        assert_eq!(ds.records()[0].outcome, Outcome::Success);
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let text = "launch_site,payload_mass,class\nKSC LC-39A,500,1\n";
        let err = read_csv(csv::Reader::from_reader(text.as_bytes())).unwrap_err();
        assert!(format!("{err:#}").contains("Booster Version Category"));
    }

    #[test]
    fn csv_bad_outcome_is_reported() {
        let text = "launch_site,payload_mass,class,Booster Version Category\nKSC,500,3,v1\n";
        let err = read_csv(csv::Reader::from_reader(text.as_bytes())).unwrap_err();
        assert!(format!("{err:#}").contains("must be 0 or 1"));
    }

    #[test]
    fn json_records_load() {
        let text = r#"[
            {"launch_site": "CCAFS LC-40", "payload_mass": 1000, "class": 1, "Booster Version Category": "v1.0"},
            {"launch_site": "VAFB SLC-4E", "payload_mass": 2000.0, "class": false, "Booster Version Category": "v1.1"}
        ]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].outcome, Outcome::Failure);
        assert_eq!(ds.sites(), ["CCAFS LC-40", "VAFB SLC-4E"]);
    }

    #[test]
    fn json_rejects_negative_payload() {
        let text = r#"[{"launch_site": "A", "payload_mass": -5, "class": 1, "Booster Version Category": "v"}]"#;
        assert!(parse_json(text).is_err());
    }

    #[test]
    fn arrow_batch_converts() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("launch_site", DataType::Utf8, false),
            Field::new("payload_mass", DataType::Float64, false),
            Field::new("class", DataType::Int64, false),
            Field::new("Booster Version Category", DataType::Utf8, false),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["KSC LC-39A", "CCAFS LC-40"])),
            Arc::new(Float64Array::from(vec![2500.0, 1000.0])),
            Arc::new(Int64Array::from(vec![1, 0])),
            Arc::new(StringArray::from(vec!["v1.1", "v1.0"])),
        ];
        let batch = RecordBatch::try_new(schema, columns).unwrap();
        let records = batch_records(&batch).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].launch_site, "KSC LC-39A");
        assert_eq!(records[1].outcome, Outcome::Failure);
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("launches.csv");
        std::fs::write(&csv_path, SAMPLE_CSV).unwrap();
        assert_eq!(load_file(&csv_path).unwrap().len(), 5);

        let txt_path = dir.path().join("launches.txt");
        std::fs::write(&txt_path, SAMPLE_CSV).unwrap();
        assert!(load_file(&txt_path).is_err());
    }
}
