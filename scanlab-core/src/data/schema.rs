//! Expected CSV layout for bar data.

use thiserror::Error;

/// Column names accepted for the timestamp, in order of preference.
pub const TIMESTAMP_COLUMNS: [&str; 3] = ["datetime", "date", "timestamp"];

/// Required numeric columns.
pub const OHLCV_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// Positions of the required columns within a CSV header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub timestamp: usize,
    pub open: usize,
    pub high: usize,
    pub low: usize,
    pub close: usize,
    pub volume: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing timestamp column (expected one of: {})", TIMESTAMP_COLUMNS.join(", "))]
    MissingTimestamp,

    #[error("missing required column: {0}")]
    MissingColumn(String),
}

/// Bar schema resolution over header names.
pub struct BarSchema;

impl BarSchema {
    /// Normalize a header name: trimmed, lowercase.
    pub fn normalize_name(name: &str) -> String {
        name.trim().trim_start_matches('\u{feff}').to_lowercase()
    }

    /// Locate required columns. Names are matched case-insensitively;
    /// extra columns are ignored.
    pub fn resolve<'a, I>(headers: I) -> Result<ColumnMap, SchemaError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<String> = headers.into_iter().map(Self::normalize_name).collect();
        let find = |wanted: &str| names.iter().position(|n| n == wanted);

        let timestamp = TIMESTAMP_COLUMNS
            .iter()
            .find_map(|&c| find(c))
            .ok_or(SchemaError::MissingTimestamp)?;

        let mut positions = [0usize; 5];
        for (slot, column) in positions.iter_mut().zip(OHLCV_COLUMNS) {
            *slot = find(column).ok_or_else(|| SchemaError::MissingColumn(column.to_string()))?;
        }
        let [open, high, low, close, volume] = positions;

        Ok(ColumnMap {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}
