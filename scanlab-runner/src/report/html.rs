//! Standalone HTML report.

use super::{ReportError, ReportPayload, ReportRenderer};

pub struct HtmlRenderer;

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2em; color: #222; }
table { border-collapse: collapse; margin-bottom: 1.5em; }
th, td { border: 1px solid #ccc; padding: 4px 10px; text-align: right; }
th { background: #f0f0f0; }
td.stock { text-align: left; font-weight: bold; }
.buy { color: #0a7d32; }
.sell { color: #b3261e; }
.muted { color: #777; font-size: 0.9em; }";

impl ReportRenderer for HtmlRenderer {
    fn render(&self, payload: &ReportPayload) -> Result<String, ReportError> {
        let mut html = String::with_capacity(4096);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<title>Stock Recommendation Report</title>\n");
        html.push_str(&format!("<style>\n{STYLE}\n</style>\n</head>\n<body>\n"));
        html.push_str("<h1>Stock Recommendation Report</h1>\n");

        let bt = &payload.backtest;
        html.push_str("<h2>Backtest Parameters</h2>\n<table>\n");
        push_param(&mut html, "Initial capital", &format!("{:.2}", bt.initial_capital));
        push_param(&mut html, "Start date", &date_or_dash(bt.start_date));
        push_param(&mut html, "End date", &date_or_dash(bt.end_date));
        html.push_str("</table>\n");

        let st = &payload.strategy;
        html.push_str("<h2>Strategy Parameters</h2>\n<table>\n");
        push_param(&mut html, "RSI period", &st.rsi_period.to_string());
        push_param(&mut html, "Low RSI threshold", &st.low_rsi.to_string());
        push_param(&mut html, "High RSI threshold", &st.high_rsi.to_string());
        html.push_str("</table>\n");

        html.push_str("<h2>Recommendations</h2>\n");
        if payload.rows.is_empty() {
            html.push_str("<p>No actionable signals.</p>\n");
        } else {
            html.push_str(
                "<table>\n<tr><th>Stock</th><th>Should Buy</th><th>Should Sell</th>\
                 <th>Recommended Price</th><th>Total Gains</th></tr>\n",
            );
            for row in &payload.rows {
                html.push_str(&format!(
                    "<tr><td class=\"stock\">{}</td><td{}>{}</td><td{}>{}</td><td>{:.2}</td><td>{:.2}</td></tr>\n",
                    escape(&row.stock),
                    if row.should_buy { " class=\"buy\"" } else { "" },
                    row.should_buy,
                    if row.should_sell { " class=\"sell\"" } else { "" },
                    row.should_sell,
                    row.recommended_price,
                    row.total_gains,
                ));
            }
            html.push_str("</table>\n");
        }

        let scan = &payload.scan;
        html.push_str(&format!(
            "<p class=\"muted\">Scan {} at {}: {} evaluated, {} actionable, {} failed",
            escape(&scan.scan_id),
            scan.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            scan.evaluated,
            scan.actionable,
            scan.failed
        ));
        if !scan.failed_symbols.is_empty() {
            let failed: Vec<String> = scan.failed_symbols.iter().map(|s| escape(s)).collect();
            html.push_str(&format!(" ({})", failed.join(", ")));
        }
        html.push_str(".</p>\n</body>\n</html>\n");

        Ok(html)
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}

fn push_param(html: &mut String, label: &str, value: &str) {
    html.push_str(&format!("<tr><th>{label}</th><td>{}</td></tr>\n", escape(value)));
}

fn date_or_dash(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::sample_payload;

    #[test]
    fn renders_every_row_and_parameter() {
        let html = HtmlRenderer.render(&sample_payload()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<td class=\"stock\">2330</td>"));
        assert!(html.contains("812.50"));
        assert!(html.contains("1234.57"));
        assert!(html.contains("10000.00"));
        assert!(html.contains("2024-05-02"));
        assert!(html.contains("2024-05-31"));
        assert!(html.contains("<tr><th>RSI period</th><td>14</td></tr>"));
        assert!(html.contains("9999"));
    }

    #[test]
    fn escapes_markup_in_symbols() {
        let html = HtmlRenderer.render(&sample_payload()).unwrap();
        assert!(html.contains("&lt;b&gt;&amp;co"));
        assert!(!html.contains("<b>&co"));
    }

    #[test]
    fn empty_report_says_so() {
        let mut payload = sample_payload();
        payload.rows.clear();
        payload.backtest.start_date = None;
        let html = HtmlRenderer.render(&payload).unwrap();
        assert!(html.contains("No actionable signals."));
        assert!(html.contains("<tr><th>Start date</th><td>-</td></tr>"));
    }
}
