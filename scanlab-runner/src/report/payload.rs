//! Report payload: ranked rows plus the parameters that produced them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use scanlab_core::data::SourceId;

use crate::config::ScanConfig;
use crate::evaluate::RecommendationResult;
use crate::scan::ScanOutcome;

/// One ranked symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "Stock")]
    pub stock: String,
    #[serde(rename = "Should_Buy")]
    pub should_buy: bool,
    #[serde(rename = "Should_Sell")]
    pub should_sell: bool,
    #[serde(rename = "Recommended_Price")]
    pub recommended_price: f64,
    #[serde(rename = "Total_Gains")]
    pub total_gains: f64,
}

impl From<&RecommendationResult> for ReportRow {
    fn from(r: &RecommendationResult) -> Self {
        Self {
            stock: r.symbol_id.clone(),
            should_buy: r.should_buy,
            should_sell: r.should_sell,
            recommended_price: r.last_close,
            total_gains: r.total_gain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestParams {
    pub initial_capital: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub rsi_period: usize,
    pub low_rsi: f64,
    pub high_rsi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub scan_id: String,
    pub generated_at: DateTime<Utc>,
    pub evaluated: usize,
    pub actionable: usize,
    pub failed: usize,
    pub failed_symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub rows: Vec<ReportRow>,
    pub backtest: BacktestParams,
    pub strategy: StrategySummary,
    pub scan: ScanSummary,
}

impl ReportPayload {
    /// Assemble the payload from ranked results and the scan that produced them.
    pub fn build(
        ranked: &[RecommendationResult],
        outcome: &ScanOutcome,
        config: &ScanConfig,
        sources: &[SourceId],
    ) -> Self {
        let (start_date, end_date) = match outcome.date_range {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };
        Self {
            rows: ranked.iter().map(ReportRow::from).collect(),
            backtest: BacktestParams {
                initial_capital: config.strategy.initial_money,
                start_date,
                end_date,
            },
            strategy: StrategySummary {
                rsi_period: config.strategy.rsi_period,
                low_rsi: config.strategy.low_rsi,
                high_rsi: config.strategy.high_rsi,
            },
            scan: ScanSummary {
                scan_id: scan_id(config, sources),
                generated_at: Utc::now(),
                evaluated: outcome.evaluated,
                actionable: outcome.recommendations.len(),
                failed: outcome.failures.len(),
                failed_symbols: outcome.failed_symbols(),
            },
        }
    }
}

/// BLAKE3 over the config hash and the ordered source list, shortened to 16 hex chars.
pub fn scan_id(config: &ScanConfig, sources: &[SourceId]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(config.config_hash().as_bytes());
    for source in sources {
        hasher.update(b"\n");
        hasher.update(source.to_string().as_bytes());
    }
    hasher.finalize().to_hex()[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::EvaluationFailure;
    use crate::evaluate::EvaluationError;

    fn rec(symbol: &str, gain: f64) -> RecommendationResult {
        RecommendationResult {
            symbol_id: symbol.into(),
            should_buy: true,
            should_sell: false,
            last_close: 99.5,
            total_gain: gain,
            series_start_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            series_end_date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
        }
    }

    #[test]
    fn build_copies_rows_and_parameters() {
        let ranked = vec![rec("2330", 50.0), rec("1101", 20.0)];
        let outcome = ScanOutcome {
            recommendations: ranked.clone(),
            failures: vec![EvaluationFailure {
                symbol: "9999".into(),
                source: "data/9999.csv".into(),
                cause: EvaluationError::WorkerLost,
            }],
            evaluated: 4,
            date_range: Some((
                NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            )),
        };
        let config = ScanConfig::default();
        let payload = ReportPayload::build(&ranked, &outcome, &config, &[SourceId::parse("data/2330.csv")]);

        assert_eq!(payload.rows.len(), 2);
        assert_eq!(payload.rows[0].stock, "2330");
        assert_eq!(payload.rows[0].recommended_price, 99.5);
        assert_eq!(payload.backtest.initial_capital, 10_000.0);
        assert_eq!(payload.backtest.start_date, NaiveDate::from_ymd_opt(2024, 5, 2));
        assert_eq!(payload.strategy.rsi_period, 14);
        assert_eq!(payload.scan.evaluated, 4);
        assert_eq!(payload.scan.actionable, 2);
        assert_eq!(payload.scan.failed_symbols, vec!["9999".to_string()]);
        assert_eq!(payload.scan.scan_id.len(), 16);
    }

    #[test]
    fn row_serializes_with_report_column_names() {
        let json = serde_json::to_value(ReportRow::from(&rec("2330", 1.0))).unwrap();
        for key in ["Stock", "Should_Buy", "Should_Sell", "Recommended_Price", "Total_Gains"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn scan_id_depends_on_sources_and_order() {
        let config = ScanConfig::default();
        let a = SourceId::parse("a.csv");
        let b = SourceId::parse("b.csv");
        let ab = scan_id(&config, &[a.clone(), b.clone()]);
        assert_eq!(ab, scan_id(&config, &[a.clone(), b.clone()]));
        assert_ne!(ab, scan_id(&config, &[b, a]));
    }
}
