use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::model::{
    Dataset, Record, DRAINED_AFTER_SOCIALIZING, FRIENDS_CIRCLE_SIZE, GOING_OUTSIDE, PERSONALITY,
    POST_FREQUENCY, REQUIRED_COLUMNS, SOCIAL_EVENT_ATTENDANCE, STAGE_FEAR, TIME_SPENT_ALONE,
};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Data sources
// ---------------------------------------------------------------------------

/// Where a dataset comes from. Also the key of [`SourceCache`](super::cache::SourceCache).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Load a dataset from any source. A single attempt; no retries.
pub fn load_source(source: &DataSource, timeout: Duration) -> Result<Dataset, LoadError> {
    let dataset = match source {
        DataSource::Url(url) => fetch_url(url, timeout)?,
        DataSource::File(path) => load_file(path)?,
    };
    log::info!("Loaded {} records from {source}", dataset.len());
    Ok(dataset)
}

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the eight survey columns
/// * `.json`    – `[{ "Time_spent_Alone": 4.0, ... }, ...]`
/// * `.parquet` – flat file with one typed column per survey column
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).map_err(|e| io_error(path, e))?;
            read_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
            parse_json(&text)
        }
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

/// Fetch a CSV over HTTP(S) and parse it.
pub fn fetch_url(url: &str, timeout: Duration) -> Result<Dataset, LoadError> {
    let unreachable = |e: reqwest::Error| LoadError::Unreachable {
        url: url.to_string(),
        reason: e.to_string(),
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(unreachable)?;
    let body = client
        .get(url)
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.bytes())
        .map_err(unreachable)?;
    read_csv(body.as_ref())
}

fn io_error(path: &Path, e: std::io::Error) -> LoadError {
    LoadError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Schema validation and row conversion
// ---------------------------------------------------------------------------

/// Fail unless `columns` is exactly the required columns, each once (order free).
///
/// A repeated name is reported as unexpected.
pub fn validate_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Result<(), LoadError> {
    let present: Vec<&str> = columns.into_iter().collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !present.iter().any(|p| p == *c))
        .map(|c| c.to_string())
        .collect();
    let unexpected: Vec<String> = present
        .iter()
        .enumerate()
        .filter(|(i, c)| !REQUIRED_COLUMNS.iter().any(|r| r == *c) || present[..*i].contains(*c))
        .map(|(_, c)| c.to_string())
        .collect();

    if missing.is_empty() && unexpected.is_empty() {
        Ok(())
    } else {
        Err(LoadError::SchemaMismatch { missing, unexpected })
    }
}

/// A row as it appears on disk, before range checks.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Time_spent_Alone")]
    time_spent_alone: f64,
    #[serde(rename = "Stage_fear")]
    stage_fear: String,
    #[serde(rename = "Social_event_attendance")]
    social_event_attendance: f64,
    #[serde(rename = "Going_outside")]
    going_outside: f64,
    #[serde(rename = "Drained_after_socializing")]
    drained_after_socializing: String,
    #[serde(rename = "Friends_circle_size")]
    friends_circle_size: f64,
    #[serde(rename = "Post_frequency")]
    post_frequency: f64,
    #[serde(rename = "Personality")]
    personality: String,
}

impl RawRecord {
    /// `row` is 1-based and only used in error messages.
    fn validate(self, row: usize) -> Result<Record, LoadError> {
        let invalid = |column: &'static str, value: f64| LoadError::InvalidValue {
            row,
            column,
            value: value.to_string(),
        };
        let non_negative = |column, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(value)
            } else {
                Err(invalid(column, value))
            }
        };
        let finite = |column, value: f64| {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(invalid(column, value))
            }
        };

        let friends = non_negative(FRIENDS_CIRCLE_SIZE, self.friends_circle_size)?;
        if friends.fract() != 0.0 || friends > u32::MAX as f64 {
            return Err(invalid(FRIENDS_CIRCLE_SIZE, friends));
        }

        Ok(Record {
            time_spent_alone: non_negative(TIME_SPENT_ALONE, self.time_spent_alone)?,
            stage_fear: self.stage_fear,
            social_event_attendance: finite(SOCIAL_EVENT_ATTENDANCE, self.social_event_attendance)?,
            going_outside: finite(GOING_OUTSIDE, self.going_outside)?,
            drained_after_socializing: self.drained_after_socializing,
            friends_circle_size: friends as u32,
            post_frequency: non_negative(POST_FREQUENCY, self.post_frequency)?,
            personality: self.personality,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV from any reader. The header is checked before any row is read.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| LoadError::Malformed {
            row: 0,
            reason: format!("reading CSV headers: {e}"),
        })?
        .clone();
    validate_columns(headers.iter())?;

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<RawRecord>().enumerate() {
        let row = i + 1;
        let raw = result.map_err(|e| LoadError::Malformed {
            row,
            reason: e.to_string(),
        })?;
        records.push(raw.validate(row)?);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
pub fn parse_json(text: &str) -> Result<Dataset, LoadError> {
    let rows: Vec<Map<String, JsonValue>> =
        serde_json::from_str(text).map_err(|e| LoadError::Malformed {
            row: 0,
            reason: format!("expected a JSON array of objects: {e}"),
        })?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, obj) in rows.into_iter().enumerate() {
        let row = i + 1;
        validate_columns(obj.keys().map(String::as_str))?;
        let raw: RawRecord = serde_json::from_value(JsonValue::Object(obj)).map_err(|e| {
            LoadError::Malformed {
                row,
                reason: e.to_string(),
            }
        })?;
        records.push(raw.validate(row)?);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per survey field.
///
/// Numeric columns may be Float64, Float32, Int64 or Int32; categorical
/// columns Utf8 or LargeUtf8. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| io_error(path, e))?;
    let parquet_error = |e: parquet::errors::ParquetError| LoadError::Malformed {
        row: 0,
        reason: format!("reading parquet: {e}"),
    };
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_error)?;
    validate_columns(builder.schema().fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build().map_err(parquet_error)?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| LoadError::Malformed {
            row: records.len() + 1,
            reason: format!("reading parquet record batch: {e}"),
        })?;
        let offset = records.len();
        for i in 0..batch.num_rows() {
            let row = offset + i + 1;
            let raw = RawRecord {
                time_spent_alone: f64_cell(&batch, TIME_SPENT_ALONE, i, row)?,
                stage_fear: string_cell(&batch, STAGE_FEAR, i, row)?,
                social_event_attendance: f64_cell(&batch, SOCIAL_EVENT_ATTENDANCE, i, row)?,
                going_outside: f64_cell(&batch, GOING_OUTSIDE, i, row)?,
                drained_after_socializing: string_cell(&batch, DRAINED_AFTER_SOCIALIZING, i, row)?,
                friends_circle_size: f64_cell(&batch, FRIENDS_CIRCLE_SIZE, i, row)?,
                post_frequency: f64_cell(&batch, POST_FREQUENCY, i, row)?,
                personality: string_cell(&batch, PERSONALITY, i, row)?,
            };
            records.push(raw.validate(row)?);
        }
    }

    Ok(Dataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn column<'a>(
    batch: &'a RecordBatch,
    name: &str,
    i: usize,
    row: usize,
) -> Result<&'a Arc<dyn Array>, LoadError> {
    let col = batch.column_by_name(name).ok_or_else(|| LoadError::SchemaMismatch {
        missing: vec![name.to_string()],
        unexpected: Vec::new(),
    })?;
    if col.is_null(i) {
        return Err(LoadError::Malformed {
            row,
            reason: format!("null value in column {name}"),
        });
    }
    Ok(col)
}

/// Read a numeric cell at batch index `i` as `f64`.
fn f64_cell(batch: &RecordBatch, name: &str, i: usize, row: usize) -> Result<f64, LoadError> {
    let col = column(batch, name, i, row)?;
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        Ok(arr.value(i))
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        Ok(arr.value(i) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        Ok(arr.value(i) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        Ok(arr.value(i) as f64)
    } else {
        Err(LoadError::Malformed {
            row,
            reason: format!("column {name} has non-numeric type {:?}", col.data_type()),
        })
    }
}

/// Read a string cell at batch index `i`.
fn string_cell(batch: &RecordBatch, name: &str, i: usize, row: usize) -> Result<String, LoadError> {
    let col = column(batch, name, i, row)?;
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<StringArray>() {
        Ok(arr.value(i).to_string())
    } else if let Some(arr) = any.downcast_ref::<LargeStringArray>() {
        Ok(arr.value(i).to_string())
    } else {
        Err(LoadError::Malformed {
            row,
            reason: format!("column {name} has non-string type {:?}", col.data_type()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Time_spent_Alone,Stage_fear,Social_event_attendance,Going_outside,\
                          Drained_after_socializing,Friends_circle_size,Post_frequency,Personality";

    fn csv_with(rows: &[&str]) -> String {
        let mut text = format!("{HEADER}\n");
        for r in rows {
            text.push_str(r);
            text.push('\n');
        }
        text
    }

    #[test]
    fn reads_typed_rows() {
        let text = csv_with(&[
            "4.0,No,4.0,6.0,No,13.0,5.0,Extrovert",
            "9, Yes ,0,0,Yes,0,3,Introvert",
        ]);
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        let second = &ds.records()[1];
        assert_eq!(second.time_spent_alone, 9.0);
        assert_eq!(second.stage_fear, "Yes");
        assert_eq!(second.friends_circle_size, 0);
        assert_eq!(ds.records()[0].friends_circle_size, 13);
        assert_eq!(ds.personalities, vec!["Extrovert", "Introvert"]);
    }

    #[test]
    fn columns_may_come_in_any_order() {
        let text = "Personality,Post_frequency,Friends_circle_size,Drained_after_socializing,\
                    Going_outside,Social_event_attendance,Stage_fear,Time_spent_Alone\n\
                    Introvert,1,2,Yes,0,1,Yes,7\n";
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.records()[0].time_spent_alone, 7.0);
        assert_eq!(ds.records()[0].personality, "Introvert");
    }

    #[test]
    fn missing_column_is_schema_mismatch() {
        let text = "Time_spent_Alone,Stage_fear\n1,Yes\n";
        match read_csv(text.as_bytes()) {
            Err(LoadError::SchemaMismatch { missing, unexpected }) => {
                assert_eq!(missing.len(), 6);
                assert!(missing.contains(&"Personality".to_string()));
                assert!(unexpected.is_empty());
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let text = csv_with(&[]).replace("Personality", "personality");
        match read_csv(text.as_bytes()) {
            Err(LoadError::SchemaMismatch { missing, unexpected }) => {
                assert_eq!(missing, vec!["Personality"]);
                assert_eq!(unexpected, vec!["personality"]);
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn extra_column_is_rejected() {
        let text = csv_with(&[]).replace("Personality", "Personality,Age");
        assert!(matches!(
            read_csv(text.as_bytes()),
            Err(LoadError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn repeated_column_is_schema_mismatch() {
        let header_only = csv_with(&[]).replace("Personality", "Personality,Personality");
        match read_csv(header_only.as_bytes()) {
            Err(LoadError::SchemaMismatch { missing, unexpected }) => {
                assert!(missing.is_empty());
                assert_eq!(unexpected, vec!["Personality"]);
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }

        let with_row = csv_with(&["1,No,1,1,No,2,3,Extrovert,Introvert"])
            .replacen("Personality", "Personality,Personality", 1);
        assert!(matches!(
            read_csv(with_row.as_bytes()),
            Err(LoadError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn header_only_gives_empty_dataset() {
        let ds = read_csv(csv_with(&[]).as_bytes()).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn unparsable_number_reports_row() {
        let text = csv_with(&["1,No,1,1,No,2,3,Extrovert", "abc,No,1,1,No,2,3,Extrovert"]);
        assert!(matches!(
            read_csv(text.as_bytes()),
            Err(LoadError::Malformed { row: 2, .. })
        ));
    }

    #[test]
    fn negative_and_fractional_values_are_rejected() {
        let negative = csv_with(&["-1,No,1,1,No,2,3,Extrovert"]);
        assert!(matches!(
            read_csv(negative.as_bytes()),
            Err(LoadError::InvalidValue { row: 1, column: TIME_SPENT_ALONE, .. })
        ));

        let fractional = csv_with(&["1,No,1,1,No,2.5,3,Extrovert"]);
        assert!(matches!(
            read_csv(fractional.as_bytes()),
            Err(LoadError::InvalidValue { column: FRIENDS_CIRCLE_SIZE, .. })
        ));
    }

    #[test]
    fn parses_records_json() {
        let text = r#"[
            {"Time_spent_Alone": 3, "Stage_fear": "No", "Social_event_attendance": 5,
             "Going_outside": 4, "Drained_after_socializing": "No",
             "Friends_circle_size": 11, "Post_frequency": 6.5, "Personality": "Extrovert"}
        ]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].friends_circle_size, 11);
        assert_eq!(ds.records()[0].post_frequency, 6.5);
    }

    #[test]
    fn json_object_with_missing_key_is_schema_mismatch() {
        let text = r#"[{"Time_spent_Alone": 3}]"#;
        assert!(matches!(
            parse_json(text),
            Err(LoadError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        assert!(matches!(
            load_file(Path::new("survey.xlsx")),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }
}
