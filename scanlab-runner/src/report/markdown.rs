//! Markdown report.

use super::{ReportError, ReportPayload, ReportRenderer};

pub struct MarkdownRenderer;

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, payload: &ReportPayload) -> Result<String, ReportError> {
        let bt = &payload.backtest;
        let st = &payload.strategy;
        let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".into());

        let mut report = format!(
            "# Stock Recommendation Report\n\n\
Scan ID: `{}`\n\n\
## Backtest Parameters\n\
- Initial capital: {:.2}\n\
- Start date: {}\n\
- End date: {}\n\n\
## Strategy Parameters\n\
- RSI period: {}\n\
- Low RSI threshold: {}\n\
- High RSI threshold: {}\n",
            payload.scan.scan_id,
            bt.initial_capital,
            date(bt.start_date),
            date(bt.end_date),
            st.rsi_period,
            st.low_rsi,
            st.high_rsi,
        );

        report.push_str("\n## Recommendations\n\n");
        if payload.rows.is_empty() {
            report.push_str("No actionable signals.\n");
        } else {
            report.push_str("| Stock | Buy | Sell | Price | Total Gains |\n");
            report.push_str("|-------|-----|------|-------|-------------|\n");
            for row in &payload.rows {
                report.push_str(&format!(
                    "| {} | {} | {} | {:.2} | {:+.2} |\n",
                    row.stock.replace('|', "\\|"),
                    if row.should_buy { "yes" } else { "" },
                    if row.should_sell { "yes" } else { "" },
                    row.recommended_price,
                    row.total_gains
                ));
            }
        }

        let scan = &payload.scan;
        report.push_str(&format!(
            "\n## Scan\n\
- Evaluated: {}\n\
- Actionable: {}\n\
- Failed: {}\n",
            scan.evaluated, scan.actionable, scan.failed
        ));
        if !scan.failed_symbols.is_empty() {
            report.push_str(&format!("- Failed symbols: {}\n", scan.failed_symbols.join(", ")));
        }
        report.push_str(&format!(
            "- Generated: {}\n",
            scan.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        Ok(report)
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}
