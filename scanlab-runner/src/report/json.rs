//! Machine-readable JSON report.

use super::{ReportError, ReportPayload, ReportRenderer};

pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render(&self, payload: &ReportPayload) -> Result<String, ReportError> {
        serde_json::to_string_pretty(payload).map_err(|e| ReportError::Render(e.to_string()))
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
