//! Time-series normalizer: one source in, one clean `PriceSeries` out.
//!
//! Pipeline per source:
//! 1. read text (file or URL)
//! 2. ingest CSV (lowercased headers, UTC timestamps, NaN for bad numbers)
//! 3. canonicalize (convert to local offset, stable sort, dedupe first-wins)
//! 4. log anomalies
//!
//! Errors are returned to the caller as-is.

use std::time::Duration;

use chrono::FixedOffset;
use log::{debug, warn};

use super::canonicalize::{AnomalyType, Canonicalizer};
use super::ingest::{ingest_csv, IngestError};
use super::source::{DataError, HttpClient, SourceId};
use crate::domain::PriceSeries;

/// Asia/Taipei has observed a fixed UTC+08:00 since 1979.
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 8 * 3600;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).expect("UTC+08:00 is in range")
}

/// Parse a `±HH:MM` (or `±HHMM`, `Z`, `UTC`) offset string.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let s = raw.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }
    s.parse::<FixedOffset>().ok()
}

/// Loads and normalizes per-symbol CSV sources.
#[derive(Debug, Clone)]
pub struct Normalizer {
    offset: FixedOffset,
    dedup: bool,
    http: HttpClient,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            offset: default_offset(),
            dedup: true,
            http: HttpClient::new(DEFAULT_HTTP_TIMEOUT),
        }
    }
}

impl Normalizer {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    pub fn with_dedup(mut self, dedup: bool) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http = HttpClient::new(timeout);
        self
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Read and normalize one source.
    pub fn load(&self, source: &SourceId) -> Result<PriceSeries, DataError> {
        let text = source.read_to_string(&self.http)?;
        self.normalize_csv(&source.symbol(), &source.to_string(), &text)
    }

    /// Normalize CSV text already in memory. `id` is used in error messages.
    pub fn normalize_csv(&self, symbol: &str, id: &str, text: &str) -> Result<PriceSeries, DataError> {
        let ingested = ingest_csv(text).map_err(|e| match e {
            IngestError::Csv(inner) => DataError::parse(id, format!("malformed CSV: {inner}")),
            other => DataError::parse(id, other.to_string()),
        })?;

        if ingested.dropped_rows > 0 {
            warn!(
                "{symbol}: dropped {} row(s) with unparseable timestamps",
                ingested.dropped_rows
            );
        }

        let (bars, removed) = Canonicalizer::canonicalize(ingested.rows, self.offset, self.dedup);
        if removed > 0 {
            debug!("{symbol}: removed {removed} duplicate timestamp(s)");
        }

        for anomaly in Canonicalizer::detect_anomalies(&bars) {
            match anomaly.anomaly_type {
                AnomalyType::ZeroVolume => {
                    debug!("{symbol}: {} zero-volume bar(s)", anomaly.count)
                }
                AnomalyType::VoidBar | AnomalyType::DuplicateTimestamp => {
                    warn!("{symbol}: {:?} x{}", anomaly.anomaly_type, anomaly.count)
                }
            }
        }

        Ok(PriceSeries::new(symbol, bars))
    }
}
