//! CSV ingestion: header resolution, timestamp parsing, numeric coercion.
//!
//! Every timestamp is brought to UTC here. Zoned strings keep their instant,
//! naive strings are taken as UTC. Numeric cells that fail to parse become
//! `f64::NAN` instead of failing the file.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::schema::{BarSchema, ColumnMap, SchemaError};

/// One CSV row after parsing, before zone conversion and ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Parsed rows plus bookkeeping about what was discarded.
#[derive(Debug, Clone, Default)]
pub struct IngestResult {
    pub rows: Vec<RawRow>,
    /// Rows whose timestamp could not be parsed.
    pub dropped_rows: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("no data rows")]
    Empty,

    #[error("timestamp column is entirely unparseable ({0} rows)")]
    NoParseableTimestamps(usize),
}

const ZONED_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%z",
];

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse one timestamp cell into a UTC instant.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

/// Coerce a numeric cell; anything unparseable is NaN.
pub fn parse_number(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Ingest CSV text.
///
/// Fails on a missing required column, on a file without data rows, or when
/// no timestamp at all can be parsed. Individual unparseable timestamps drop
/// their row and are counted in `dropped_rows`.
pub fn ingest_csv(text: &str) -> Result<IngestResult, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns: ColumnMap = BarSchema::resolve(reader.headers()?.iter())?;

    let mut result = IngestResult::default();
    let mut total = 0usize;

    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        total += 1;

        let Some(timestamp) = record.get(columns.timestamp).and_then(parse_timestamp) else {
            result.dropped_rows += 1;
            continue;
        };

        result.rows.push(RawRow {
            timestamp,
            open: parse_number(record.get(columns.open)),
            high: parse_number(record.get(columns.high)),
            low: parse_number(record.get(columns.low)),
            close: parse_number(record.get(columns.close)),
            volume: parse_number(record.get(columns.volume)),
        });
    }

    if total == 0 {
        return Err(IngestError::Empty);
    }
    if result.rows.is_empty() {
        return Err(IngestError::NoParseableTimestamps(total));
    }

    Ok(result)
}
