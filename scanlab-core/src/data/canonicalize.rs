use chrono::FixedOffset;

use super::ingest::RawRow;
use crate::domain::Bar;

/// Canonicalizer for ingested rows
pub struct Canonicalizer;

impl Canonicalizer {
    /// Canonicalize rows: convert to the target offset, sort, dedupe.
    ///
    /// The sort is stable, so among rows sharing a timestamp the one that came
    /// first in the input survives deduplication. Returns the bars and the
    /// number of duplicates removed.
    pub fn canonicalize(rows: Vec<RawRow>, offset: FixedOffset, dedup: bool) -> (Vec<Bar>, usize) {
        let mut bars: Vec<Bar> = rows
            .into_iter()
            .map(|row| Bar {
                timestamp: row.timestamp.with_timezone(&offset),
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            })
            .collect();

        bars.sort_by_key(|b| b.timestamp);

        let before = bars.len();
        if dedup {
            bars.dedup_by_key(|b| b.timestamp);
        }
        let removed = before - bars.len();

        (bars, removed)
    }

    /// Detect anomalies (void bars, zero volume, duplicate timestamps)
    pub fn detect_anomalies(bars: &[Bar]) -> Vec<AnomalyReport> {
        let mut anomalies = Vec::new();

        let void_count = bars.iter().filter(|b| b.is_void()).count();
        if void_count > 0 {
            anomalies.push(AnomalyReport {
                anomaly_type: AnomalyType::VoidBar,
                count: void_count,
                severity: Severity::Warning,
            });
        }

        let zero_volume_count = bars.iter().filter(|b| b.volume == 0.0).count();
        if zero_volume_count > 0 {
            anomalies.push(AnomalyReport {
                anomaly_type: AnomalyType::ZeroVolume,
                count: zero_volume_count,
                severity: Severity::Info,
            });
        }

        let duplicate_count = bars
            .windows(2)
            .filter(|w| w[0].timestamp == w[1].timestamp)
            .count();
        if duplicate_count > 0 {
            anomalies.push(AnomalyReport {
                anomaly_type: AnomalyType::DuplicateTimestamp,
                count: duplicate_count,
                severity: Severity::Warning,
            });
        }

        anomalies
    }
}

#[derive(Debug)]
pub struct AnomalyReport {
    pub anomaly_type: AnomalyType,
    pub count: usize,
    pub severity: Severity,
}

#[derive(Debug, PartialEq)]
pub enum AnomalyType {
    VoidBar,
    ZeroVolume,
    DuplicateTimestamp,
}

#[derive(Debug, PartialEq)]
pub enum Severity {
    Info,
    Warning,
}
