//! PriceSeries — one symbol's normalized bar sequence.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::bar::Bar;

/// Ordered bars for one symbol.
///
/// Produced by the normalizer: timestamps strictly increasing, no duplicates,
/// every timestamp in the same offset. Read-only for everything downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<FixedOffset>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    /// Close of the final bar (NaN if the series is empty).
    pub fn last_close(&self) -> f64 {
        self.bars.last().map(|b| b.close).unwrap_or(f64::NAN)
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(Bar::date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(Bar::date)
    }

    /// Restrict the series to bars whose local date falls in `[start, end]`.
    ///
    /// Either bound may be open. Used by the single-symbol backtest path.
    pub fn window(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> PriceSeries {
        let bars = self
            .bars
            .iter()
            .filter(|b| {
                let d = b.date();
                start.map_or(true, |s| d >= s) && end.map_or(true, |e| d <= e)
            })
            .cloned()
            .collect();
        PriceSeries::new(self.symbol.clone(), bars)
    }
}
