//! ScanLab Runner — batch scanning, ranking and report emission.
//!
//! This crate builds on `scanlab-core` to provide:
//! - TOML scan configuration
//! - Per-symbol evaluation with isolated, collected failures
//! - Sequential or rayon-parallel batch scanning with optional deadlines
//! - Gain ranking with an explicit tie-break policy
//! - HTML / Markdown / JSON report rendering

pub mod config;
pub mod evaluate;
pub mod rank;
pub mod report;
pub mod scan;

pub use config::{ConfigError, ScanConfig};
pub use evaluate::{EvaluationError, RecommendationResult, SymbolEvaluator};
pub use rank::{rank, TieBreak};
pub use report::{
    emit_report, ReportError, ReportFormat, ReportPayload, ReportRenderer, ReportRow,
};
pub use scan::{BatchScanner, EvaluationFailure, ScanOutcome};
