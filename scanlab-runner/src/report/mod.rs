//! Report payload, renderers and emission.
//!
//! A scan produces one `ReportPayload`; a `ReportRenderer` turns it into a
//! document and `emit_report` writes it to disk.

mod html;
mod json;
mod markdown;
mod payload;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;
pub use payload::{scan_id, BacktestParams, ReportPayload, ReportRow, ScanSummary, StrategySummary};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write report {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot render report: {0}")]
    Render(String),
}

/// Output document format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn renderer(self) -> Box<dyn ReportRenderer> {
        match self {
            ReportFormat::Html => Box::new(HtmlRenderer),
            ReportFormat::Markdown => Box::new(MarkdownRenderer),
            ReportFormat::Json => Box::new(JsonRenderer),
        }
    }
}

/// Turns a payload into a document.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, payload: &ReportPayload) -> Result<String, ReportError>;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;
}

/// Render `payload` and write it to `path`, creating parent directories.
pub fn emit_report(
    payload: &ReportPayload,
    renderer: &dyn ReportRenderer,
    path: &Path,
) -> Result<(), ReportError> {
    let document = renderer.render(payload)?;
    let io_err = |source| ReportError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, document).map_err(io_err)?;
    log::info!("report written: {}", path.display());
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    pub fn sample_payload() -> ReportPayload {
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        ReportPayload {
            rows: vec![
                ReportRow {
                    stock: "2330".into(),
                    should_buy: true,
                    should_sell: false,
                    recommended_price: 812.5,
                    total_gains: 1234.567,
                },
                ReportRow {
                    stock: "<b>&co".into(),
                    should_buy: false,
                    should_sell: true,
                    recommended_price: 45.0,
                    total_gains: -12.0,
                },
            ],
            backtest: BacktestParams {
                initial_capital: 10_000.0,
                start_date: Some(d(2)),
                end_date: Some(d(31)),
            },
            strategy: StrategySummary {
                rsi_period: 14,
                low_rsi: 30.0,
                high_rsi: 70.0,
            },
            scan: ScanSummary {
                scan_id: "abc123".into(),
                generated_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
                evaluated: 3,
                actionable: 2,
                failed: 1,
                failed_symbols: vec!["9999".into()],
            },
        }
    }
}
